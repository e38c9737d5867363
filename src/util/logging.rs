//! Structured logging setup
//!
//! Logs go to stderr only; stdout carries the completion stream and must
//! stay clean. Level resolution order: explicit `--log-level`, the
//! `-v`/`-q` flags, then `DJANGO_COMPLETIONS_LOG_LEVEL`, defaulting to
//! `error` so an editor invoking the tool sees a quiet stderr. `RUST_LOG`
//! still takes precedence when set.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "DJANGO_COMPLETIONS_LOG_LEVEL";

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::ERROR,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// Resolve the level from CLI flags and the environment
    pub fn from_args(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = if let Some(level_str) = log_level {
            parse_level(level_str)
        } else if verbose {
            Level::DEBUG
        } else if quiet {
            Level::ERROR
        } else {
            let level_str = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "error".to_string());
            parse_level(&level_str)
        };
        Self { level }
    }
}

/// Parse a log level, defaulting to ERROR on invalid input
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to ERROR. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::ERROR
        }
    }
}

/// Initialize the tracing subscriber. Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(
                format!("django_completions={}", config.level)
                    .parse()
                    .expect("valid directive"),
            );
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("Info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("bogus"), Level::ERROR);
    }

    #[test]
    fn test_default_config_is_quiet() {
        assert_eq!(LoggingConfig::default().level, Level::ERROR);
    }

    #[test]
    #[serial]
    fn test_from_args_precedence() {
        env::set_var(LOG_LEVEL_ENV, "info");
        assert_eq!(
            LoggingConfig::from_args(Some("warn"), true, false).level,
            Level::WARN
        );
        assert_eq!(LoggingConfig::from_args(None, true, false).level, Level::DEBUG);
        assert_eq!(LoggingConfig::from_args(None, false, true).level, Level::ERROR);
        assert_eq!(LoggingConfig::from_args(None, false, false).level, Level::INFO);
        env::remove_var(LOG_LEVEL_ENV);
    }

    #[test]
    #[serial]
    fn test_from_args_env_default() {
        env::remove_var(LOG_LEVEL_ENV);
        assert_eq!(LoggingConfig::from_args(None, false, false).level, Level::ERROR);
    }
}
