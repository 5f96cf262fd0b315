//! wayfarer: a web crawler whose visited set and frontier live on disk.
//!
//! The crate is split into:
//! - [`storage`]: the out-of-core Dedup Set and Frontier Queue
//! - [`crawl`]: the scheduler, URL canonicalization, events and statistics
//! - [`fetch`]: the Transport trait and its reqwest implementation
//! - [`extract`]: regex and DOM link extraction strategies
//!
//! A minimal crawl:
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfarer::{CrawlConfig, HttpTransport, Scheduler, StorageManager};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = CrawlConfig::default();
//! let mut storage = StorageManager::new(&config.storage_dir);
//! storage.initialize()?;
//!
//! let mut scheduler = Scheduler::new(config, &storage, Arc::new(HttpTransport::new()?))?;
//! scheduler.add_nodes(["https://example.com/"])?;
//! let stats = scheduler.run().await?;
//! println!("{}", stats);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod storage;

pub use config::CrawlConfig;
pub use crawl::{CrawlStatistics, Scheduler};
pub use error::{CrawlError, Result};
pub use fetch::{HttpTransport, Transport};
pub use storage::StorageManager;
