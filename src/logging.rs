// src/logging.rs
// =============================================================================
// Logging setup.
//
// Everything goes to stderr through tracing-subscriber so stdout only carries
// the final report (or JSON). The level comes from RUST_LOG when set,
// otherwise "info", or "debug" with --verbose.
//
//   RUST_LOG=wayfarer=debug,reqwest=warn wayfarer crawl https://example.com
// =============================================================================

use tracing_subscriber::{fmt, EnvFilter};

/// Builds the filter: RUST_LOG wins, then the verbosity flag.
pub fn build_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install logger: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builds_for_both_levels() {
        // RUST_LOG may be set in CI; either way a filter comes back
        let quiet = build_filter(false).to_string();
        let loud = build_filter(true).to_string();
        assert!(!quiet.is_empty());
        assert!(!loud.is_empty());
    }
}
