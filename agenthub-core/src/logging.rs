use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Builds the log filter shared by the binaries.
///
/// `RUST_LOG` wins when set. Otherwise a bare level such as `debug` applies
/// to the agenthub crates only, and a full directive string is used as is.
pub fn env_filter(config: &LoggingConfig, crates: &[&str]) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = config.level.trim();
    let directives = if level.contains('=') {
        level.to_string()
    } else {
        crates
            .iter()
            .map(|c| format!("{}={}", c, level))
            .collect::<Vec<_>>()
            .join(",")
    };

    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}
