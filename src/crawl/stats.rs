// src/crawl/stats.rs
// =============================================================================
// Crawl statistics.
//
// Counters accumulate for the whole crawl; the snapshot also carries gauges
// (frontier length, outstanding requests, storage bytes) read at the moment
// it is taken. Rates are derived when the snapshot is built, never cached.
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Monotonic counters the scheduler bumps as it works.
#[derive(Debug, Default, Clone)]
pub(crate) struct Counters {
    pub requests: u64,
    pub non_ok_responses: u64,
    pub failed_requests: u64,
    pub bytes_processed: u64,
    pub time_fetching: Duration,
    pub pruned_nodes: u64,
}

/// Point-in-time view of a crawl.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlStatistics {
    pub visited_pages: usize,
    pub visited_domains: usize,
    pub frontier_len: usize,
    pub outstanding_requests: usize,
    pub storage_bytes: u64,
    pub requests: u64,
    pub non_ok_responses: u64,
    pub failed_requests: u64,
    /// failed ÷ requests, 0 before the first request
    pub fetch_fail_rate: f64,
    /// Mean fetch time in milliseconds, 0 before the first request
    pub average_fetch_ms: f64,
    pub pruned_nodes: u64,
    pub bytes_processed: u64,
}

/// Gauges read from the scheduler when a snapshot is taken.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gauges {
    pub visited_pages: usize,
    pub visited_domains: usize,
    pub frontier_len: usize,
    pub outstanding_requests: usize,
    pub storage_bytes: u64,
}

impl CrawlStatistics {
    pub(crate) fn derive(counters: &Counters, gauges: Gauges) -> Self {
        let (fetch_fail_rate, average_fetch_ms) = if counters.requests == 0 {
            (0.0, 0.0)
        } else {
            let requests = counters.requests as f64;
            (
                counters.failed_requests as f64 / requests,
                counters.time_fetching.as_secs_f64() * 1000.0 / requests,
            )
        };

        CrawlStatistics {
            visited_pages: gauges.visited_pages,
            visited_domains: gauges.visited_domains,
            frontier_len: gauges.frontier_len,
            outstanding_requests: gauges.outstanding_requests,
            storage_bytes: gauges.storage_bytes,
            requests: counters.requests,
            non_ok_responses: counters.non_ok_responses,
            failed_requests: counters.failed_requests,
            fetch_fail_rate,
            average_fetch_ms,
            pruned_nodes: counters.pruned_nodes,
            bytes_processed: counters.bytes_processed,
        }
    }

    pub fn fetch_success_rate(&self) -> f64 {
        1.0 - self.fetch_fail_rate
    }
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "====== Statistics ======")?;
        writeln!(f, " visited pages:      {}", self.visited_pages)?;
        writeln!(f, " visited domains:    {}", self.visited_domains)?;
        writeln!(f, " current nodes:      {}", self.frontier_len)?;
        writeln!(f, " pending reqs:       {}", self.outstanding_requests)?;
        writeln!(f, " data usage:         {}", format_size(self.storage_bytes))?;
        writeln!(
            f,
            " fetch success rate: {:.1}%",
            self.fetch_success_rate() * 100.0
        )?;
        writeln!(f, " avg. request time:  {}ms", self.average_fetch_ms.floor())?;
        writeln!(f, " non-OK responses:   {}", self.non_ok_responses)?;
        writeln!(f, " pruned nodes:       {}", self.pruned_nodes)?;
        writeln!(f, " data processed:     {}", format_size(self.bytes_processed))?;
        write!(f, "========================")
    }
}

/// Formats a byte count with binary units.
pub fn format_size(bytes: u64) -> String {
    const K: u64 = 1024;
    const M: u64 = K * K;
    const G: u64 = M * K;

    if bytes >= G {
        format!("{:.1} GiB", bytes as f64 / G as f64)
    } else if bytes >= M {
        format!("{:.1} MiB", bytes as f64 / M as f64)
    } else if bytes >= K {
        format!("{:.1} KiB", bytes as f64 / K as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauges() -> Gauges {
        Gauges {
            visited_pages: 3,
            visited_domains: 1,
            frontier_len: 7,
            outstanding_requests: 2,
            storage_bytes: 2048,
        }
    }

    #[test]
    fn test_rates_before_any_request() {
        let stats = CrawlStatistics::derive(&Counters::default(), gauges());
        assert_eq!(stats.fetch_fail_rate, 0.0);
        assert_eq!(stats.average_fetch_ms, 0.0);
        assert_eq!(stats.fetch_success_rate(), 1.0);
    }

    #[test]
    fn test_rates_are_derived() {
        let counters = Counters {
            requests: 4,
            failed_requests: 1,
            time_fetching: Duration::from_millis(400),
            ..Counters::default()
        };
        let stats = CrawlStatistics::derive(&counters, gauges());

        assert_eq!(stats.fetch_fail_rate, 0.25);
        assert!((stats.average_fetch_ms - 100.0).abs() < 1e-9);
        assert_eq!(stats.frontier_len, 7);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MiB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GiB");
    }

    #[test]
    fn test_display_mentions_every_metric() {
        let text = CrawlStatistics::derive(&Counters::default(), gauges()).to_string();
        assert!(text.contains("visited pages:      3"));
        assert!(text.contains("data usage:         2.0 KiB"));
        assert!(text.contains("fetch success rate: 100.0%"));
    }
}
