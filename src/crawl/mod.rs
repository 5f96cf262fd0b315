// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Submodules:
// - scheduler: traversal loop, validation, backpressure
// - links: canonicalization and link resolution
// - events: publish/subscribe for crawl events
// - stats: counters and the statistics snapshot
// =============================================================================

mod events;
mod links;
mod scheduler;
mod stats;

pub use events::{
    CrawlEvents, EventBus, NewDomain, NodeDequeued, PageVisited, SubscriptionHandle,
};
pub use links::{canonicalize, parse_node, resolve_link, ParsedNode};
pub use scheduler::Scheduler;
pub use stats::{format_size, CrawlStatistics};
