//! Logger setup for the binaries.

use flexi_logger::{opt_format, FlexiLoggerError, Logger, LoggerHandle};

/// Starts logging to stderr.
///
/// `RUST_LOG` wins over `default_spec` when set. Keep the returned handle
/// alive for as long as logging is wanted.
pub fn setup_logging(default_spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_spec)?
        .log_to_stderr()
        .format(opt_format)
        .start()
}
