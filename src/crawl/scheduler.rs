// src/crawl/scheduler.rs
// =============================================================================
// The crawl scheduler: the traversal loop and everything it keeps track of.
//
// How it works:
// 1. Seeds go through validation and into the on-disk frontier queue
// 2. Nodes are dequeued in FIFO order (discovery order) and validated again,
//    since the same URL may have been queued twice before either copy ran
// 3. The canonical URL is marked visited, the hostname is recorded, and the
//    fetch is issued
// 4. HTML responses are handed to the link extractor; every link is resolved
//    against the page and submitted back through step 1
//
// Validation (same predicate at enqueue and dequeue time):
// - scheme is http or https
// - hostname matches the configured pattern, if there is one
// - canonical URL (query removed) has not been visited
// Failing nodes are pruned: counted, never retried, never logged as errors.
//
// Two modes:
// - serial (max_pending_requests <= 1): one node at a time, start to finish
// - concurrent: fetches are pushed into a FuturesUnordered and the loop keeps
//   dispatching until the outstanding count goes over the threshold, then
//   polls completions while it waits out the cooldown
//
// Everything runs on one thread. Completions are handled by the same loop
// that dispatches, so the storage and counters need no locking. The
// outstanding counter goes up before a fetch is dispatched and down exactly
// once when its outcome is handled, success or failure.
// =============================================================================

use super::events::{CrawlEvents, NewDomain, NodeDequeued, PageVisited};
use super::links::{parse_node, resolve_link, ParsedNode};
use super::stats::{Counters, CrawlStatistics, Gauges};
use crate::config::CrawlConfig;
use crate::error::Result;
use crate::extract::{extractor_for, LinkExtractor};
use crate::fetch::{FetchResponse, Transport, TransportError};
use crate::storage::{DedupSet, FrontierQueue, StorageManager};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const VISITED_PAGES: &str = "visited_pages";
const VISITED_DOMAINS: &str = "visited_domains";
const NODE_QUEUE: &str = "node_queue";

// What a dispatched fetch resolves to
struct FetchOutcome {
    url: String,
    canonical: String,
    elapsed: Duration,
    result: std::result::Result<FetchResponse, TransportError>,
}

type PendingFetch = LocalBoxFuture<'static, FetchOutcome>;

/// Drives a crawl from seed URLs until the frontier is exhausted.
pub struct Scheduler {
    config: CrawlConfig,
    hostname_filter: Option<Regex>,
    transport: Arc<dyn Transport>,
    extractor: Box<dyn LinkExtractor>,
    visited_pages: DedupSet,
    visited_domains: DedupSet,
    frontier: FrontierQueue,
    outstanding: usize,
    counters: Counters,
    last_report: Option<Instant>,
    /// Subscribe here before calling [`Scheduler::run`].
    pub events: CrawlEvents,
}

impl Scheduler {
    /// Validates `config` and creates the scheduler's sets and queue.
    ///
    /// `storage` must already be initialized.
    pub fn new(
        config: CrawlConfig,
        storage: &StorageManager,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let hostname_filter = config.validate()?;
        let extractor = extractor_for(config.use_deep_parser);

        Ok(Scheduler {
            hostname_filter,
            transport,
            extractor,
            visited_pages: storage.dedup_set(VISITED_PAGES)?,
            visited_domains: storage.dedup_set(VISITED_DOMAINS)?,
            frontier: storage.frontier_queue(NODE_QUEUE)?,
            outstanding: 0,
            counters: Counters::default(),
            last_report: None,
            events: CrawlEvents::default(),
            config,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn outstanding_requests(&self) -> usize {
        self.outstanding
    }

    /// True once `url`'s canonical form has been visited.
    pub fn has_visited(&self, url: &str) -> Result<bool> {
        match parse_node(url) {
            Some(parsed) => self.visited_pages.has(&parsed.canonical),
            None => Ok(false),
        }
    }

    /// Validates each node and enqueues the ones that pass.
    pub fn add_nodes<I>(&mut self, nodes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            if self.validate(node)?.is_some() {
                self.frontier.enqueue(node)?;
            } else {
                self.counters.pruned_nodes += 1;
            }
        }
        Ok(())
    }

    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::derive(
            &self.counters,
            Gauges {
                visited_pages: self.visited_pages.len(),
                visited_domains: self.visited_domains.len(),
                frontier_len: self.frontier.len(),
                outstanding_requests: self.outstanding,
                storage_bytes: self.visited_pages.byte_usage()
                    + self.visited_domains.byte_usage()
                    + self.frontier.byte_usage(),
            },
        )
    }

    /// Crawls until the frontier is empty and no fetch is outstanding.
    ///
    /// Only storage failures and failing event subscribers end a crawl
    /// early; transport failures are counted and skipped.
    pub async fn run(&mut self) -> Result<CrawlStatistics> {
        info!(
            seeds = self.frontier.len(),
            max_pending = self.config.max_pending_requests,
            deep_parser = self.config.use_deep_parser,
            "starting crawl"
        );

        if self.config.is_concurrent() {
            self.run_concurrent().await?;
        } else {
            self.run_serial().await?;
        }

        let stats = self.statistics();
        info!(
            pages = stats.visited_pages,
            domains = stats.visited_domains,
            requests = stats.requests,
            failed = stats.failed_requests,
            pruned = stats.pruned_nodes,
            "crawl finished"
        );
        Ok(stats)
    }

    async fn run_serial(&mut self) -> Result<()> {
        while let Some(node) = self.frontier.dequeue()? {
            if let Some(fetch) = self.begin_visit(node)? {
                let outcome = fetch.await;
                self.finish_visit(outcome)?;
            }
            self.report_progress();
        }
        Ok(())
    }

    async fn run_concurrent(&mut self) -> Result<()> {
        let threshold = self.config.max_pending_requests;
        let mut in_flight: FuturesUnordered<PendingFetch> = FuturesUnordered::new();

        while !self.frontier.is_empty() || self.outstanding > 0 {
            // Soft cap: the dispatch below can leave us one over threshold
            if self.outstanding > threshold {
                let cooldown = self.config.request_overflow_cooldown();
                self.settle(&mut in_flight, cooldown).await?;
                continue;
            }

            if let Some(node) = self.frontier.dequeue()? {
                if let Some(fetch) = self.begin_visit(node.clone())? {
                    in_flight.push(fetch);
                }
                self.events.node_dequeued.publish(&NodeDequeued { url: node })?;
                self.report_progress();
            } else {
                debug!(outstanding = self.outstanding, "waiting for something to do");
                let idle = self.config.idle_interval();
                self.settle(&mut in_flight, idle).await?;
            }
        }
        Ok(())
    }

    // Sleeps for `pause`, handling every fetch that completes meanwhile
    async fn settle(
        &mut self,
        in_flight: &mut FuturesUnordered<PendingFetch>,
        pause: Duration,
    ) -> Result<()> {
        let deadline = tokio::time::sleep(pause);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => return Ok(()),
                Some(outcome) = in_flight.next() => self.finish_visit(outcome)?,
            }
        }
    }

    fn validate(&self, node: &str) -> Result<Option<ParsedNode>> {
        let Some(parsed) = parse_node(node) else {
            return Ok(None);
        };
        if parsed.scheme != "http" && parsed.scheme != "https" {
            return Ok(None);
        }
        if let Some(filter) = &self.hostname_filter {
            if !filter.is_match(&parsed.hostname) {
                return Ok(None);
            }
        }
        if self.visited_pages.has(&parsed.canonical)? {
            return Ok(None);
        }
        Ok(Some(parsed))
    }

    // Everything up to and including dispatch. Returns the fetch to await,
    // or None if the node was pruned.
    fn begin_visit(&mut self, node: String) -> Result<Option<PendingFetch>> {
        let Some(parsed) = self.validate(&node)? else {
            self.counters.pruned_nodes += 1;
            return Ok(None);
        };

        self.visited_pages.add(&parsed.canonical)?;
        if self.visited_domains.add(&parsed.hostname)? {
            self.events.new_domain.publish(&NewDomain {
                hostname: parsed.hostname,
            })?;
        }

        self.outstanding += 1;
        self.counters.requests += 1;
        debug!(url = %node, outstanding = self.outstanding, "dispatching fetch");

        let transport = Arc::clone(&self.transport);
        let canonical = parsed.canonical;
        let fetch = async move {
            let started = Instant::now();
            let result = transport.fetch(&node).await;
            FetchOutcome {
                url: node,
                canonical,
                elapsed: started.elapsed(),
                result,
            }
        };
        Ok(Some(fetch.boxed_local()))
    }

    fn finish_visit(&mut self, outcome: FetchOutcome) -> Result<()> {
        self.outstanding -= 1;

        let response = match outcome.result {
            Ok(response) => response,
            Err(e) => {
                self.counters.failed_requests += 1;
                warn!(url = %outcome.url, error = %e, "fetch failed");
                return Ok(());
            }
        };

        self.counters.bytes_processed += response.body.len() as u64;
        self.counters.time_fetching += outcome.elapsed;
        if !response.ok {
            self.counters.non_ok_responses += 1;
        }

        if response.is_html() {
            let page = PageVisited {
                url: outcome.canonical,
                html: response.body,
            };
            self.events.page_visited.publish(&page)?;
            self.discover_links(&page.html, &page.url)?;
        }
        Ok(())
    }

    // Unresolvable links are dropped without being counted
    fn discover_links(&mut self, html: &str, parent: &str) -> Result<()> {
        let Ok(base) = Url::parse(parent) else {
            return Ok(());
        };

        let links: Vec<String> = self
            .extractor
            .extract(html)
            .iter()
            .filter_map(|raw| resolve_link(&base, raw))
            .collect();

        debug!(page = parent, links = links.len(), "discovered links");
        self.add_nodes(links)
    }

    fn report_progress(&mut self) {
        let Some(interval) = self.config.stats_interval() else {
            return;
        };
        let now = Instant::now();
        if self
            .last_report
            .is_some_and(|last| now.duration_since(last) < interval)
        {
            return;
        }
        self.last_report = Some(now);

        let stats = self.statistics();
        info!(
            pages = stats.visited_pages,
            domains = stats.visited_domains,
            frontier = stats.frontier_len,
            outstanding = stats.outstanding_requests,
            storage_bytes = stats.storage_bytes,
            fail_rate = stats.fetch_fail_rate,
            avg_fetch_ms = stats.average_fetch_ms,
            pruned = stats.pruned_nodes,
            "crawl progress"
        );
    }
}
