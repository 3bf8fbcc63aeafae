use std::path::Path;

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use crate::error::StdResult;

pub const DEFAULT_LEVEL: &str = "warn";

/// Starts the global logger. `RUST_LOG` takes precedence over `level`.
///
/// Without `log_dir` everything goes to stderr. With it, records go to
/// rotated files named after `basename` and warnings are still shown on
/// stderr. The returned handle must be kept alive until the program exits.
pub fn init(level: &str, log_dir: Option<&Path>, basename: &str) -> StdResult<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(level)?;
    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename(basename))
            .rotate(
                Criterion::Size(1_000_000),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(3),
            )
            .duplicate_to_stderr(Duplicate::Warn),
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}
