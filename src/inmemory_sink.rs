// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A [`Sink`] that keeps rendered lines in memory instead of writing them to stdout.
//! Useful for:
//!
//! - Unit testing code that logs through a [`Dispatcher`](crate::Dispatcher)
//! - Capturing output where stdout is redirected or unavailable
//! - Programmatically examining what a dispatcher produced
//!
//! Lines are stored behind a `Mutex<Vec<String>>`, so several units of work can append
//! concurrently. Rendering is the same as every other sink, see [`crate::render`].

use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::context::LogContext;
use crate::severity::Severity;
use crate::sink::Sink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// A sink that stores every emitted line.
///
/// # Example
///
/// ```rust
/// use debuggable::{Dispatcher, ImmediateQueue, InMemorySink, Severity};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new("memory", Severity::Verbose));
/// let dispatcher = Dispatcher::builder("app")
///     .enable(true)
///     .min_level(Severity::Verbose)
///     .queue(Arc::new(ImmediateQueue))
///     .build();
/// dispatcher.add(sink.clone());
///
/// dispatcher.info("Test message 42");
///
/// let logs = sink.drain_logs();
/// assert!(logs.contains("[memory]"));
/// assert!(logs.contains("Test message 42"));
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    name: String,
    enabled: AtomicBool,
    min_level: Severity,
    bundle_identifier: Option<String>,
    log_contexts: Vec<LogContext>,
    colors: Option<ColorConfiguration>,
    descriptions: Option<DescriptionConfiguration>,
    logs: Mutex<Vec<String>>,
}

impl InMemorySink {
    /// An enabled sink with no glyphs and no colors, so stored lines are easy to match.
    pub fn new(name: impl Into<String>, min_level: Severity) -> Self {
        Self {
            name: name.into(),
            enabled: AtomicBool::new(true),
            min_level,
            bundle_identifier: None,
            log_contexts: Vec::new(),
            colors: None,
            descriptions: None,
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_enabled(self, value: bool) -> Self {
        self.enabled.store(value, Ordering::Relaxed);
        self
    }

    pub fn with_bundle_identifier(mut self, bundle_identifier: impl Into<String>) -> Self {
        self.bundle_identifier = Some(bundle_identifier.into());
        self
    }

    pub fn with_log_contexts(mut self, contexts: impl IntoIterator<Item = LogContext>) -> Self {
        self.log_contexts = contexts.into_iter().collect();
        self
    }

    pub fn with_color_configuration(mut self, colors: ColorConfiguration) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_description_configuration(
        mut self,
        descriptions: Option<DescriptionConfiguration>,
    ) -> Self {
        self.descriptions = descriptions;
        self
    }

    /// A copy of the stored lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes every stored line and returns them joined with newlines.
    ///
    /// Each stored line already contains the newline between header and message, so the
    /// result reads the same as the equivalent stdout output.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut output = String::new();
        for line in logs.drain(..) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    }
}

impl Sink for InMemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn set_enabled(&self, value: bool) {
        self.enabled.store(value, Ordering::Relaxed);
    }

    fn min_level(&self) -> Severity {
        self.min_level
    }

    fn bundle_identifier(&self) -> Option<&str> {
        self.bundle_identifier.as_deref()
    }

    fn log_contexts(&self) -> &[LogContext] {
        &self.log_contexts
    }

    fn color_configuration(&self) -> Option<&ColorConfiguration> {
        self.colors.as_ref()
    }

    fn description_configuration(&self) -> Option<&DescriptionConfiguration> {
        self.descriptions.as_ref()
    }

    fn emit(&self, line: String) {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

// Boilerplate notes:
// - Debug: Derived
// - Clone: NOT implemented - a clone would split the stored lines and the enabled flag
// - Default: NOT implemented - a sink needs a name and a floor
// - Send/Sync: Automatically implemented
