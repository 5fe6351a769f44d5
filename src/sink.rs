// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::context::LogContext;
use crate::log_record::LogRecord;
use crate::render::{LineStyle, render_line};
use crate::severity::Severity;
use std::fmt::Debug;
use std::io::Write;

/**
A single named log consumer.

Sinks are registered into a [`Dispatcher`](crate::Dispatcher) as `Arc<dyn Sink>`. The
enabled flag is toggled through `&self`, so a change made through any handle is seen
by every list holding the same sink.

Only the identity, the enabled flag and the floor are required. The provided
[`Sink::log`] gates, renders with [`crate::render`] and calls [`Sink::emit`], which
writes to stdout unless overridden.
*/
pub trait Sink: Debug + Send + Sync {
    /// Key used by `remove` and `enable`.
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, value: bool);

    /// Floor for this sink, see [`Severity::allows`].
    fn min_level(&self) -> Severity;

    fn bundle_identifier(&self) -> Option<&str> {
        None
    }

    /// Contexts this sink cares about. Empty means all.
    fn log_contexts(&self) -> &[LogContext] {
        &[]
    }

    fn color_configuration(&self) -> Option<&ColorConfiguration> {
        None
    }

    fn description_configuration(&self) -> Option<&DescriptionConfiguration> {
        Some(DescriptionConfiguration::shared_default())
    }

    fn is_allowed_to_log(&self, level: Severity) -> bool {
        self.min_level().allows(level)
    }

    fn should_log(&self, context: &LogContext) -> bool {
        context.matches(self.log_contexts())
    }

    /// Renders the record into the line [`Sink::emit`] receives.
    fn render(&self, record: &LogRecord) -> String {
        let style = LineStyle {
            sink_name: self.name(),
            bundle_identifier: self.bundle_identifier(),
            descriptions: self.description_configuration(),
            colors: self.color_configuration(),
        };
        render_line(&style, record)
    }

    /// Writes one rendered line. The default writes to stdout, holding the lock for the whole line.
    fn emit(&self, line: String) {
        let mut lock = std::io::stdout().lock();
        // nowhere to report a failed stdout write
        let _ = lock.write_all(line.as_bytes());
        let _ = lock.write_all(b"\n");
    }

    /**
    Renders and emits the record.

    Gates on the level first, so a sink driven directly behaves the same as one driven
    by a dispatcher.
    */
    fn log(&self, record: &LogRecord) {
        if !self.is_allowed_to_log(record.level()) {
            return;
        }
        let line = self.render(record);
        self.emit(line);
    }
}

/*
Boilerplate notes.

# Sink

Clone makes no sense for a trait object that is shared through Arc.
PartialEq by name is what remove/enable use, but implementing it on dyn Sink would suggest
identity semantics we don't have.  Compare names explicitly instead.
Default, Display, From/Into: no.
Send/Sync are required since units of work run on other threads.
*/
