//! Command-line interface parsing for Neowatch
//!
//! This module defines the clap surface: view subcommands that read only the
//! local cache, the refresh and prune maintenance commands, and the api-key
//! and cache-dir overrides used for scripting and tests.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::data::nasa::DEMO_API_KEY;

/// Environment variable consulted when --api-key is not given
pub const API_KEY_ENV: &str = "NASA_API_KEY";

/// Neowatch - track near-Earth asteroids from NASA's NeoWs feed
#[derive(Parser, Debug)]
#[command(name = "neowatch")]
#[command(about = "Near-Earth asteroid feed with a local offline cache")]
#[command(version)]
pub struct Cli {
    /// NASA API key (falls back to $NASA_API_KEY, then DEMO_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Override the cache directory (default: XDG cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
///
/// Without a subcommand, neowatch refreshes both feeds and prints the week
/// view, mirroring what opening the app used to do.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch the latest feed window and picture of the day into the cache
    Refresh,
    /// Show cached asteroids approaching today
    Today,
    /// Show cached asteroids for the current 7-day window
    Week,
    /// Show every cached asteroid
    All,
    /// Show the cached picture of the day
    Picture,
    /// Delete cached records older than yesterday
    Prune,
}

impl Cli {
    /// Resolves the API key from the flag, the environment, or the demo key
    pub fn resolve_api_key(&self) -> String {
        if let Some(key) = &self.api_key {
            return key.clone();
        }
        std::env::var(API_KEY_ENV).unwrap_or_else(|_| DEMO_API_KEY.to_string())
    }
}
