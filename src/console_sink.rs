// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::context::LogContext;
use crate::severity::Severity;
use crate::sink::Sink;
use std::sync::atomic::{AtomicBool, Ordering};

/**
A reference sink that writes to stdout.

Each line is written while holding the stdout lock, so lines from concurrently running
units of work don't interleave mid-line.

```
use debuggable::{ColorConfiguration, ConsoleSink, Severity};

let sink = ConsoleSink::new("console", Severity::Verbose)
    .with_bundle_identifier("com.example.app")
    .with_color_configuration(ColorConfiguration::linux());
assert_eq!(debuggable::Sink::name(&sink), "console");
```
 */
#[derive(Debug)]
pub struct ConsoleSink {
    name: String,
    enabled: AtomicBool,
    min_level: Severity,
    bundle_identifier: Option<String>,
    log_contexts: Vec<LogContext>,
    colors: Option<ColorConfiguration>,
    descriptions: Option<DescriptionConfiguration>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived
// - Clone: NOT implemented - sinks are shared through Arc, a copy would have its own
//   enabled flag and silently break enable-by-name
// - PartialEq/Eq/Hash: NOT implemented - see Sink
// - Default: NOT implemented - a sink needs a name
// - Send/Sync: Automatically implemented

impl ConsoleSink {
    /// An enabled sink with the default glyph table and no colors.
    pub fn new(name: impl Into<String>, min_level: Severity) -> Self {
        Self {
            name: name.into(),
            enabled: AtomicBool::new(true),
            min_level,
            bundle_identifier: None,
            log_contexts: Vec::new(),
            colors: None,
            descriptions: Some(DescriptionConfiguration::default()),
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

    /// `None` removes glyphs from rendered lines.
    pub fn with_description_configuration(
        mut self,
        descriptions: Option<DescriptionConfiguration>,
    ) -> Self {
        self.descriptions = descriptions;
        self
    }
}

impl Sink for ConsoleSink {
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
}
