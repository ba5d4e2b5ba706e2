//! Client session
//!
//! A session is the composition root of the crate: it owns exactly one usage
//! tracker, one paginator counting against it and one cache registry. Nothing
//! here is global, so two sessions never share a budget or a cache.

use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::Paginator;
use crate::usage::{UsageObserver, UsageSnapshot, UsageTracker, WindowRoller};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Usage of both windows, stamped with when it was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionUsage {
    pub taken_at: DateTime<Utc>,
    #[serde(flatten)]
    pub usage: UsageSnapshot,
}

/// One client session against the remote service
#[derive(Debug)]
pub struct Session {
    config: Config,
    usage: Arc<UsageTracker>,
    paginator: Paginator,
    caches: CacheRegistry,
}

impl Session {
    /// Create a session whose usage transitions are logged through `tracing`
    pub fn new(config: Config) -> Result<Self> {
        let tracker = UsageTracker::from_config(&config.usage);
        Self::build(config, tracker)
    }

    /// Create a session reporting usage transitions to `observer`
    pub fn with_observer(config: Config, observer: Arc<dyn UsageObserver>) -> Result<Self> {
        let tracker = UsageTracker::from_config(&config.usage).with_observer(observer);
        Self::build(config, tracker)
    }

    fn build(config: Config, tracker: UsageTracker) -> Result<Self> {
        config.validate()?;

        let usage = Arc::new(tracker);
        let paginator = Paginator::new(config.pagination).with_usage_tracker(usage.clone());

        Ok(Self {
            config,
            usage,
            paginator,
            caches: CacheRegistry::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn usage(&self) -> &Arc<UsageTracker> {
        &self.usage
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Current usage of both windows
    pub fn usage_snapshot(&self) -> SessionUsage {
        SessionUsage {
            taken_at: Utc::now(),
            usage: self.usage.snapshot(),
        }
    }

    /// Start resetting this session's windows on the configured cadence
    ///
    /// Must be called from within a tokio runtime. The windows stop rolling
    /// when the returned handle is dropped.
    pub fn spawn_window_roller(&self) -> WindowRoller {
        WindowRoller::spawn(
            self.usage.clone(),
            self.config.usage.short_window(),
            self.config.usage.daily_window(),
        )
    }

    /// HTTP client for this session's endpoint, feeding server-reported
    /// usage into the session's tracker
    pub fn http_client(&self, token: Option<String>) -> Result<HttpClient> {
        let client = HttpClient::new(&self.config.http)?.with_usage_tracker(self.usage.clone());
        Ok(match token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    /// Purge every credential-linked cache after the credentials were revoked
    ///
    /// Every registered cache is asked to clear even if some fail; the error
    /// lists the areas that did not.
    pub async fn revoke_credentials(&self) -> Result<()> {
        info!("Credentials revoked, clearing resource caches");

        match self.caches.clear_all().await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Cache purge after revocation incomplete: {}", e);
                Err(e)
            }
        }
    }
}
