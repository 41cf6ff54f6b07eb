//! Global subscriber setup

use jiralink_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Set to `json` to emit newline-delimited JSON instead of text.
pub const LOG_FORMAT_ENV: &str = "JIRALINK_LOG_FORMAT";

/// Install a global `tracing` subscriber for `config`.
///
/// `RUST_LOG` wins over the configured level when set. Returns `false` when
/// another global subscriber was already installed, which is not an error for
/// callers embedding the client in a larger application.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = if config.enabled {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
    } else {
        EnvFilter::new("off")
    };

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let installed = if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init().is_ok()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json, "Tracing subscriber installed");
    }
    installed
}
