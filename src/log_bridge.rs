// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes records from the [`log`] crate through a [`Dispatcher`].
//!
//! Libraries that log with `log::info!` and friends end up in the same sinks as code
//! using this crate directly. Levels map as follows:
//!
//! | `log::Level` | [`Severity`]             |
//! |--------------|--------------------------|
//! | `Error`      | [`Severity::Error`]      |
//! | `Warn`       | [`Severity::Warning`]    |
//! | `Info`       | [`Severity::Info`]       |
//! | `Debug`      | [`Severity::Debug`]      |
//! | `Trace`      | [`Severity::Verbose`]    |
//!
//! The record's target becomes the log context, so sinks can filter by module path.
//!
//! ```no_run
//! debuggable::log_bridge::install(debuggable::global_dispatcher::global_dispatcher())
//!     .expect("no other logger installed");
//! log::warn!("from the log crate");
//! ```

use crate::context::LogContext;
use crate::dispatcher::Dispatcher;
use crate::severity::Severity;
use crate::source_location::SourceLocation;
use std::sync::Arc;

/// Maps a `log` level onto the nearest [`Severity`].
pub fn severity_for(level: log::Level) -> Severity {
    match level {
        log::Level::Error => Severity::Error,
        log::Level::Warn => Severity::Warning,
        log::Level::Info => Severity::Info,
        log::Level::Debug => Severity::Debug,
        log::Level::Trace => Severity::Verbose,
    }
}

/// A [`log::Log`] implementation backed by a dispatcher.
#[derive(Debug, Clone)]
pub struct LogBridge {
    dispatcher: Arc<Dispatcher>,
}

impl LogBridge {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.dispatcher
            .would_log(severity_for(metadata.level()), None)
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = severity_for(record.level());
        let context = LogContext::new(record.target().to_string());
        if !self.dispatcher.would_log(level, Some(&context)) {
            return;
        }
        let location = SourceLocation::new(
            record.file().unwrap_or("<unknown>").to_string(),
            record.module_path().unwrap_or("").to_string(),
            record.line().unwrap_or(0),
            0,
        );
        self.dispatcher
            .log_at(location, level, Some(&context), record.args().to_string());
    }

    fn flush(&self) {}
}

/**
Installs a bridge to `dispatcher` as the process-wide `log` backend.

Succeeds at most once per process. The `log` crate's max level is opened fully, leaving
gating to the dispatcher.
*/
pub fn install(dispatcher: Arc<Dispatcher>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(dispatcher)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImmediateQueue, InMemorySink};
    use log::Log;

    #[test]
    fn level_mapping() {
        assert_eq!(severity_for(log::Level::Warn), Severity::Warning);
        assert_eq!(severity_for(log::Level::Trace), Severity::Verbose);
    }

    #[test]
    fn forwards_records_with_target_as_context() {
        let sink = Arc::new(InMemorySink::new("memory", Severity::Error));
        let dispatcher = Dispatcher::builder("bridge")
            .min_level(Severity::Verbose)
            .queue(Arc::new(ImmediateQueue))
            .sink(sink.clone())
            .build();
        let bridge = LogBridge::new(Arc::new(dispatcher));

        let record = log::Record::builder()
            .level(log::Level::Error)
            .target("db::pool")
            .file(Some("src/db/pool.rs"))
            .line(Some(40))
            .args(format_args!("pool exhausted"))
            .build();
        bridge.log(&record);

        let logs = sink.drain_logs();
        assert!(logs.contains("[db::pool]"), "{logs}");
        assert!(logs.contains("[pool.rs]:[40:0:"), "{logs}");
        assert!(logs.contains("pool exhausted"));
        assert!(bridge.enabled(&log::Metadata::builder().level(log::Level::Info).build()));
        assert!(!bridge.enabled(&log::Metadata::builder().level(log::Level::Trace).build()));
    }
}
