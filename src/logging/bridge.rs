// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapter feeding `log` crate records into the pipeline so third-party
//! crates share the process's sink and severity hierarchy. `log` has no
//! FATAL and this pipeline has no TRACE, so TRACE folds into DEBUG.

use super::{LogLocation, LogSeverity};

fn map_level(level: log::Level) -> LogSeverity {
    match level {
        log::Level::Error => LogSeverity::Error,
        log::Level::Warn => LogSeverity::Warn,
        log::Level::Info => LogSeverity::Info,
        log::Level::Debug | log::Level::Trace => LogSeverity::Debug,
    }
}

struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        super::logger_is_enabled_for(Some(metadata.target()), map_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let location = match (record.file_static(), record.line()) {
            (Some(file_name), Some(line)) => Some(LogLocation {
                function_name: "",
                file_name,
                line_number: u64::from(line),
            }),
            _ => None,
        };
        super::log(
            location.as_ref(),
            map_level(record.level()),
            Some(record.target()),
            *record.args(),
        );
    }

    fn flush(&self) {}
}

/// Installs the bridge as the process-wide `log` logger. Level filtering is
/// delegated to the pipeline, so the `log` max level opens up entirely.
pub fn install() -> Result<(), log::SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
