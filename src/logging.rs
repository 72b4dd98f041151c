//! Tracing subscriber setup for the `travelcard` binary

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Pick the filter directive: `RUST_LOG` wins, then `-v` flags, then config.
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: u8) -> String {
    if let Ok(from_env) = std::env::var("RUST_LOG") {
        if !from_env.is_empty() {
            return from_env;
        }
    }

    match verbose {
        0 => config.level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so card output on
/// stdout stays clean.
pub fn init(config: &LoggingConfig, verbose: u8) {
    let filter = EnvFilter::new(filter_directive(config, verbose));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig::default();
        assert_eq!(filter_directive(&config, 0), "warn");
        assert_eq!(filter_directive(&config, 1), "info");
        assert_eq!(filter_directive(&config, 2), "debug");
        assert_eq!(filter_directive(&config, 7), "trace");
    }
}
