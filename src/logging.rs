//! Logging setup for the `alua` binary
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "alua=debug,segmenter=debug,health=debug,arousal=debug,fallback=debug,scorer=debug,attribution=debug,analyzer=debug,storage=debug,api=debug"
    } else {
        "info"
    }
}

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_covers_pipeline_targets() {
        let filter = default_filter(true);
        for target in ["segmenter", "health", "arousal", "fallback", "scorer", "attribution", "analyzer", "api"] {
            assert!(filter.contains(&format!("{target}=debug")), "{target}");
        }
        assert_eq!(default_filter(false), "info");
    }
}
