//! Logging initialization for `favd`.
//!
//! Configures the `tracing` subscriber with level filtering via the `FAVD_LOG`
//! environment variable. Falls back to the configured level when the variable
//! is unset or invalid.
//!
//! ```bash
//! FAVD_LOG=debug favd render --states states.json --user u1
//! FAVD_LOG=favorites_dashboard::grid=trace,warn favd render ...
//! ```

use crate::config::LogLevel;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "FAVD_LOG";

/// Filter from `FAVD_LOG`, else `fallback`.
pub fn env_filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback.as_str()))
}

/// Installs the global subscriber, writing to stderr.
///
/// A second call is a no-op, so tests and embedding hosts may call it freely.
pub fn init(fallback: LogLevel) {
    let installed = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn level_names_are_valid_directives() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert!(
                EnvFilter::try_new(level.as_str()).is_ok(),
                "failed to parse directive: {}",
                level.as_str()
            );
        }
    }

    #[test]
    #[serial(env)]
    fn env_var_overrides_configured_level() {
        let original = std::env::var(LOG_ENV).ok();
        std::env::set_var(LOG_ENV, "favorites_dashboard=trace,warn");
        let filter = env_filter(LogLevel::Error);
        match original {
            Some(v) => std::env::set_var(LOG_ENV, v),
            None => std::env::remove_var(LOG_ENV),
        }
        assert!(filter.to_string().contains("favorites_dashboard=trace"));
    }

    #[test]
    #[serial(env)]
    fn init_twice_does_not_panic() {
        init(LogLevel::Warn);
        init(LogLevel::Debug);
    }
}
