//! Logging setup for the application.

use crate::config::{GlobalLogLevel, ProgressLogLevel, Settings};
use env_logger::Builder;
use log::LevelFilter;

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Trace => Self::Trace,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Error => Self::Error,
        }
    }
}

impl From<ProgressLogLevel> for LevelFilter {
    fn from(level: ProgressLogLevel) -> Self {
        match level {
            ProgressLogLevel::Trace => Self::Trace,
            ProgressLogLevel::Debug => Self::Debug,
            ProgressLogLevel::Info => Self::Info,
            ProgressLogLevel::Warn => Self::Warn,
        }
    }
}

/// Initializes the logger from the resolved settings.
///
/// - Progress reports use `settings.progress_log_level`.
/// - Everything else uses `settings.global_log_level`, unless `RUST_LOG` is
///   set, in which case its directives win.
///
/// Calling this twice is harmless; the second call only logs at debug level.
pub fn init_logger(settings: &Settings) {
    let mut builder = Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(directives) => {
            builder.parse_filters(&directives);
        }
        Err(_) => {
            builder.filter_level(settings.global_log_level.into());
        }
    }

    // Set the progress module's log level specifically (prioritize this over global level)
    builder.filter_module(
        "module_forge_app::progress",
        settings.progress_log_level.into(),
    );

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    log::debug!(
        "Logger initialized with global log level: {:?}, progress log level: {:?}",
        settings.global_log_level,
        settings.progress_log_level
    );
}
