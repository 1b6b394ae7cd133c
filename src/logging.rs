// src/logging.rs

use crate::errors::{StockchatError, StockchatResult};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Initializes the file logger. Logging to stdout would corrupt the terminal
/// UI, so everything goes to `stockchat.log` in the working directory. The
/// returned handle must stay alive for the lifetime of the program.
pub fn init_logging(log_level: &str) -> StockchatResult<LoggerHandle> {
    Logger::try_with_env_or_str(log_level)
        .map_err(|e| StockchatError::config_error(format!("Invalid log level: {}", e)))?
        .log_to_file(FileSpec::default().basename("stockchat").suppress_timestamp())
        .append()
        .start()
        .map_err(|e| StockchatError::config_error(format!("Failed to start logger: {}", e)))
}
