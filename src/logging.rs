//! Optional logger bootstrap for binaries and demos.
//!
//! The library itself only emits through the `log` facade. Call
//! [`init_logging`] once near the start of `main` to see those events on
//! stderr, or in rotating files when a directory is given.

use crate::error::{Error, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "contact_store";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _logger: LoggerHandle,
}

/// Start the global logger.
///
/// Calling it again with the same arguments is a no-op; calling it with a
/// different level or directory is rejected.
///
/// # Errors
/// [`Error::Config`] for an unknown level, a relative directory, or a
/// conflicting re-initialization; [`Error::Io`] if the directory can't be
/// created.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<()> {
    let level = normalize_level(level)?;
    if let Some(dir) = log_dir {
        if !dir.is_absolute() {
            return Err(Error::Config(format!(
                "log directory must be absolute, got `{}`",
                dir.display()
            )));
        }
    }
    let log_dir = log_dir.map(Path::to_path_buf);

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, log_dir.clone()))?;
    if state.level != level || state.log_dir != log_dir {
        return Err(Error::Config(format!(
            "logging already initialized with level `{}`; refusing to reconfigure",
            state.level
        )));
    }
    Ok(())
}

/// `(level, log_dir)` of the active logger, if one was started.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

fn start_logger(level: &'static str, log_dir: Option<PathBuf>) -> Result<LoggingState> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| Error::Config(format!("invalid log level `{level}`: {err}")))?;

    let logger = match &log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger.log_to_stderr(),
    };

    let handle = logger
        .start()
        .map_err(|err| Error::Config(format!("failed to start logger: {err}")))?;

    log::info!(
        "logging started level={level} version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(LoggingState {
        level,
        log_dir,
        _logger: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(Error::Config(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        ))),
    }
}
