//! Logging for the bridge CLI.
//!
//! Colored output on stderr (stdout carries protocol output) plus an optional
//! plain-text log file, with thread-safe one-time initialization.

use crate::error::BridgeError;

use common::ErrorLocation;

use std::io::stderr;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

static LOGGER_INIT: Once = Once::new();

static LOGGER_REQUESTED: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "bridge.log";

const LOGGER_READY_PREFIX: &str = "Bridge logging at level ";

const LOGGER_REPEAT_WARNING: &str = "Logger was already set up; ignoring repeat call";

#[cfg(debug_assertions)]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Initialize stderr logging, plus `{log_dir}/bridge.log` when a directory is given.
///
/// Safe to call more than once; later calls log a warning and return `Ok`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a global logger is
/// already installed by someone else.
pub fn initialize(log_dir: Option<&Path>, level: LevelFilter) -> Result<(), BridgeError> {
    if LOGGER_REQUESTED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_REPEAT_WARNING}");
        return Ok(());
    }

    let mut result = Ok(());

    LOGGER_INIT.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("{LOGGER_READY_PREFIX}{level:?}");
        }
    });

    result
}

#[track_caller]
pub(crate) fn initialize_internal(log_dir: Option<&Path>, level: LevelFilter) -> Result<(), BridgeError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{target}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                target = record.target(),
            ))
        })
        .chain(stderr());

    let mut dispatch = Dispatch::new()
        .level(level)
        .level_for("tungstenite", level.min(LevelFilter::Info))
        .level_for("tokio_tungstenite", level.min(LevelFilter::Info))
        .level_for("hyper_util", level.min(LevelFilter::Info))
        .chain(stderr_dispatch);

    if let Some(log_dir) = log_dir {
        let log_file_path = log_dir.join(LOG_FILE_NAME);
        let file = fern::log_file(&log_file_path).map_err(|e| BridgeError::Bridge {
            message: format!("Failed to create log file {}: {e}", log_file_path.display()),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;

        dispatch = dispatch.chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{date} - {level}] {message} [{file}:{line}]",
                        date = format_rfc3339(SystemTime::now()),
                        level = record.level(),
                        message = message,
                        file = record.file().unwrap_or("unknown"),
                        line = record.line().unwrap_or(0)
                    ))
                })
                .chain(file),
        );
    }

    dispatch.apply().map_err(|e| BridgeError::Bridge {
        message: format!("Failed to initialize logger: {e}"),
        location: ErrorLocation::from(std::panic::Location::caller()),
    })?;

    Ok(())
}
