// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - crawl: reset storage, seed the frontier, crawl until it drains, report
// - clean: delete the storage directory left behind by a crawl
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wayfarer::storage::DEFAULT_STORAGE_DIR;
use wayfarer::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wayfarer",
    version = "0.1.0",
    about = "A web crawler that keeps its visited set and frontier on disk",
    long_about = "wayfarer starts from seed URLs and follows every link it finds. \
                  The set of visited pages and the queue of pending pages live in \
                  files, so a crawl can grow well past available memory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl outward from one or more seed URLs
    ///
    /// Example: wayfarer crawl https://example.com --max-pending 50
    Crawl(CrawlArgs),

    /// Remove the storage directory left by a previous crawl
    Clean {
        /// Storage directory to remove
        #[arg(long, default_value = DEFAULT_STORAGE_DIR)]
        storage_dir: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Seed URLs (http or https)
    #[arg(required = true)]
    pub seeds: Vec<String>,

    /// Read settings from a JSON file instead of the flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Outstanding fetches allowed before pausing; 1 crawls serially
    #[arg(long, default_value_t = 1)]
    pub max_pending: usize,

    /// How long to pause when too many fetches are outstanding (ms)
    #[arg(long, default_value_t = 200)]
    pub cooldown_ms: u64,

    /// How long to wait when nothing is queued but fetches are running (ms)
    #[arg(long, default_value_t = 1000)]
    pub idle_ms: u64,

    /// Parse pages with a real HTML parser (also follows <script src>)
    #[arg(long)]
    pub deep: bool,

    /// Only crawl hostnames matching this regex
    #[arg(long)]
    pub hostname_regex: Option<String>,

    /// Directory for the on-disk sets and queue (wiped at start)
    #[arg(long, default_value = DEFAULT_STORAGE_DIR)]
    pub storage_dir: PathBuf,

    /// Append every newly seen hostname to this file
    #[arg(long)]
    pub domains_file: Option<PathBuf>,

    /// Log progress at most this often (ms); 0 disables
    #[arg(long, default_value_t = 1000)]
    pub stats_interval_ms: u64,

    /// Print the final statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CrawlArgs {
    /// Loads the config file if one was given, otherwise uses the flags.
    pub fn to_config(&self) -> wayfarer::Result<CrawlConfig> {
        if let Some(path) = &self.config {
            return CrawlConfig::from_json_file(path);
        }

        Ok(CrawlConfig {
            max_pending_requests: self.max_pending,
            request_overflow_cooldown_ms: self.cooldown_ms,
            idle_interval_ms: self.idle_ms,
            use_deep_parser: self.deep,
            hostname_regex: self.hostname_regex.clone(),
            storage_dir: self.storage_dir.clone(),
            stats_interval_ms: self.stats_interval_ms,
        })
    }
}
