//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpPageFetcher;
use crate::pagination::{Page, PageRequest};
use crate::session::Session;
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Runner {
    /// Create a runner writing to stdout
    pub fn new(cli: Cli) -> Self {
        Self::with_output(cli, Box::new(std::io::stdout()))
    }

    /// Create a runner writing its messages to `out`
    pub fn with_output(cli: Cli, out: Box<dyn Write + Send>) -> Self {
        Self {
            cli,
            out: Mutex::new(out),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                path,
                page,
                per_page,
                skip_first,
                skip_last,
            } => {
                self.fetch(path, *page, *per_page, *skip_first, *skip_last)
                    .await
            }
            Commands::FetchAll { path, stream } => self.fetch_all(path, *stream).await,
            Commands::Config => self.show_config(),
        }
    }

    /// Load configuration, applying command-line overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.cli.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.http.base_url.clone_from(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    fn session(&self) -> Result<Session> {
        Session::new(self.load_config()?)
    }

    fn fetcher(&self, session: &Session, path: &str) -> Result<HttpPageFetcher<Value>> {
        let client = session.http_client(self.cli.token.clone())?;
        Ok(HttpPageFetcher::new(Arc::new(client), path))
    }

    /// Fetch one page
    async fn fetch(
        &self,
        path: &str,
        page: u32,
        per_page: Option<u32>,
        skip_first: u32,
        skip_last: u32,
    ) -> Result<()> {
        let session = self.session()?;
        let fetcher = self.fetcher(&session, path)?;

        let max_page_size = session.paginator().max_page_size();
        let request =
            PageRequest::with_ceiling(page, per_page.unwrap_or(max_page_size), max_page_size)?
                .skip_first(skip_first)
                .skip_last(skip_last);

        let page = session.paginator().fetch_page(&fetcher, request).await?;
        self.output_page(&page)?;

        self.output_usage(&session)
    }

    /// Fetch every page of `path`
    ///
    /// Nothing is printed unless every page succeeds, except with `stream`,
    /// where each page is printed as soon as it arrives.
    async fn fetch_all(&self, path: &str, stream: bool) -> Result<()> {
        let session = self.session()?;
        let fetcher = self.fetcher(&session, path)?;
        let start = Instant::now();
        let mut total = 0usize;

        if stream {
            let mut pages = session.paginator().stream_pages(&fetcher);
            while let Some(page) = pages.next().await {
                let page = page?;
                total += page.len();
                self.output_page(&page)?;
            }
        } else {
            let items = session.paginator().fetch_all(&fetcher).await?;
            total = items.len();
            for item in &items {
                self.output_record(item)?;
            }
        }

        info!(
            "Fetched {} item(s) from {} in {:?}",
            total,
            path,
            start.elapsed()
        );
        self.output_usage(&session)
    }

    /// Print the effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let yaml = config.to_yaml()?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(yaml.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn output_page(&self, page: &Page<Value>) -> Result<()> {
        debug!("Page {} carried {} item(s)", page.number(), page.len());
        for item in page {
            self.output_record(item)?;
        }
        Ok(())
    }

    fn output_record(&self, item: &Value) -> Result<()> {
        self.output_message(&json!({
            "type": "RECORD",
            "record": item,
        }))
    }

    fn output_usage(&self, session: &Session) -> Result<()> {
        let snapshot = session.usage_snapshot();
        info!(
            "Usage: short {:.1}% ({}), daily {:.1}% ({})",
            snapshot.usage.short.percent_used,
            snapshot.usage.short.classification,
            snapshot.usage.daily.percent_used,
            snapshot.usage.daily.classification
        );
        self.output_message(&json!({
            "type": "USAGE",
            "usage": snapshot,
        }))
    }

    /// Output a message
    fn output_message(&self, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}
