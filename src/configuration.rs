// SPDX-License-Identifier: MIT OR Apache-2.0

//! Injectable presentation tables.
//!
//! Rendering asks two tables how to present a level:
//!
//! - [`DescriptionConfiguration`] maps each [`Severity`] to a glyph placed at the start
//!   of the line.
//! - [`ColorConfiguration`] holds one wrapping function per level and is applied to the
//!   finished line.
//!
//! Neither table is hardcoded into sinks. A sink with no color configuration emits
//! plain text. A sink with no description configuration emits no glyph.
//!
//! ```
//! use debuggable::{ColorConfiguration, DescriptionConfiguration, Severity};
//!
//! let glyphs = DescriptionConfiguration::default();
//! assert_eq!(glyphs.description(Severity::Error), "‼️");
//!
//! let colors = ColorConfiguration::linux();
//! assert_eq!(colors.apply(Severity::Error, "boom"), "\u{1b}[0;31mboom\u{1b}[0m");
//! assert_eq!(ColorConfiguration::plain().apply(Severity::Error, "boom"), "boom");
//! ```

use crate::severity::Severity;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, LazyLock};

/// A function that decorates a rendered line.
pub type ColorFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

const ANSI_RESET: &str = "\u{1b}[0m";

/**
One decoration function per level.

The functions receive the complete rendered line and return the text to emit.
*/
#[derive(Clone)]
pub struct ColorConfiguration {
    description: String,
    colors: [ColorFn; 7],
}

impl ColorConfiguration {
    /// Builds a configuration from a function that is asked once per level.
    pub fn from_fn<F>(description: impl Into<String>, mut make: F) -> Self
    where
        F: FnMut(Severity) -> ColorFn,
    {
        Self {
            description: description.into(),
            colors: Severity::ALL.map(&mut make),
        }
    }

    /// Leaves every line unchanged.
    pub fn plain() -> Self {
        Self::from_fn("default", |_| -> ColorFn { Arc::new(|line: &str| line.to_string()) })
    }

    /// ANSI escape colors for terminals.
    pub fn linux() -> Self {
        Self::from_fn("linux", |level| -> ColorFn {
            let code = ansi_code(level);
            Arc::new(move |line: &str| format!("{code}{line}{ANSI_RESET}"))
        })
    }

    /// Replaces the function used for one level.
    pub fn with_color(mut self, level: Severity, color: ColorFn) -> Self {
        self.colors[level.rank() as usize] = color;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Decorates `line` for `level`.
    pub fn apply(&self, level: Severity, line: &str) -> String {
        (self.colors[level.rank() as usize])(line)
    }
}

impl Default for ColorConfiguration {
    fn default() -> Self {
        Self::plain()
    }
}

impl Debug for ColorConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorConfiguration")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn ansi_code(level: Severity) -> &'static str {
    match level {
        Severity::Disabled => "\u{1b}[0;30m",
        Severity::Debug => "\u{1b}[0;33m",
        Severity::Info => "\u{1b}[0;34m",
        Severity::Warning => "\u{1b}[0;33m",
        Severity::Error => "\u{1b}[0;31m",
        Severity::FatalError => "\u{1b}[0;35m",
        Severity::Verbose => "\u{1b}[0;32m",
    }
}

/// Maps levels to the glyph shown at the start of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionConfiguration {
    configuration: HashMap<Severity, String>,
}

impl DescriptionConfiguration {
    pub fn new(configuration: HashMap<Severity, String>) -> Self {
        Self { configuration }
    }

    /// The glyph for `level`, or `""` when the table has no entry.
    pub fn description(&self, level: Severity) -> &str {
        self.configuration.get(&level).map(String::as_str).unwrap_or("")
    }

    /// A shared instance of the default table.
    pub fn shared_default() -> &'static DescriptionConfiguration {
        static DEFAULT: LazyLock<DescriptionConfiguration> =
            LazyLock::new(DescriptionConfiguration::default);
        &DEFAULT
    }
}

impl Default for DescriptionConfiguration {
    fn default() -> Self {
        let configuration = [
            (Severity::Disabled, "⛔️"),
            (Severity::Debug, "💬"),
            (Severity::Info, "ℹ️"),
            (Severity::Warning, "⚠️"),
            (Severity::Error, "‼️"),
            (Severity::FatalError, "🔥"),
            (Severity::Verbose, "🔬"),
        ]
        .into_iter()
        .map(|(level, glyph)| (level, glyph.to_string()))
        .collect();
        Self { configuration }
    }
}
