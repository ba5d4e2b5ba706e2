//! CLI module
//!
//! Command-line interface over a single [`Session`](crate::session::Session).
//!
//! # Commands
//!
//! - `fetch` - Fetch one page, with optional skips
//! - `fetch-all` - Fetch every page of an endpoint
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
