//! Logger setup for the binary.

use crate::config::LogLevel;

/// Install `env_logger` at the configured level.
///
/// `RUST_LOG` still takes precedence when set. Calling this twice is
/// harmless; the second logger is ignored.
pub fn init_logging(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .format_timestamp_secs()
        .try_init();

    if let Err(e) = result {
        log::debug!("Logger already initialised: {}", e);
    }
}
