// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich debugging metadata for error types.
//!
//! An error implementing [`Debuggable`] can explain itself: a stable identifier, a one
//! sentence reason, where it came from, and optionally what might have caused it, how to
//! fix it and where to read more. [`Debuggable::debuggable_help`] renders all of that in a
//! short single-line form or a long multi-paragraph form.
//!
//! ```
//! use debuggable::{Debuggable, HelpFormat, SourceLocation};
//!
//! #[derive(Debug)]
//! struct ConfigError {
//!     key: String,
//! }
//!
//! impl Debuggable for ConfigError {
//!     fn identifier(&self) -> String {
//!         "missingKey".to_string()
//!     }
//!     fn reason(&self) -> String {
//!         format!("The key '{}' is missing.", self.key)
//!     }
//!     fn suggested_fixes(&self) -> Vec<String> {
//!         vec!["Add the key to config.toml.".to_string()]
//!     }
//! }
//!
//! let error = ConfigError { key: "port".to_string() };
//! assert_eq!(error.full_identifier(), "ConfigError.missingKey");
//! assert_eq!(
//!     error.debuggable_help(HelpFormat::Short),
//!     "⚠️ [ConfigError.missingKey: The key 'port' is missing.] [Suggested fixes: Add the key to config.toml.]"
//! );
//! ```

use crate::source_location::SourceLocation;
use std::backtrace::Backtrace;
use std::fmt::Debug;

/// How much [`Debuggable::debuggable_help`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HelpFormat {
    /// One line: identifier, reason, location, causes and fixes.
    Short,
    /// Paragraphs, including every link list.
    #[default]
    Long,
}

/**
An error that carries debugging help.

Only [`identifier`](Debuggable::identifier) and [`reason`](Debuggable::reason) are
required. Everything else defaults to empty.

`identifier` must not be built from the error's `Debug` output, since the long help
may end up in that output.
*/
pub trait Debuggable: Debug + Send + Sync {
    /// Identifies this particular error within its type.
    fn identifier(&self) -> String;

    /// Usually one sentence, ending with a period.
    fn reason(&self) -> String;

    /// The last path segment of the type name, generics removed.
    fn type_identifier(&self) -> String {
        let full = std::any::type_name::<Self>();
        let without_generics = full.split('<').next().unwrap_or(full);
        without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics)
            .to_string()
    }

    /// A readable name for the type, shown before the reason in the long help.
    fn readable_name(&self) -> String {
        self.type_identifier()
    }

    /// `TypeIdentifier.identifier`.
    fn full_identifier(&self) -> String {
        format!("{}.{}", self.type_identifier(), self.identifier())
    }

    fn source_location(&self) -> Option<SourceLocation> {
        None
    }

    /// Frames recorded when the error was created, see [`make_stack_trace`].
    fn stack_trace(&self) -> Option<Vec<String>> {
        None
    }

    fn possible_causes(&self) -> Vec<String> {
        Vec::new()
    }

    fn suggested_fixes(&self) -> Vec<String> {
        Vec::new()
    }

    fn documentation_links(&self) -> Vec<String> {
        Vec::new()
    }

    fn stack_overflow_questions(&self) -> Vec<String> {
        Vec::new()
    }

    fn github_issues(&self) -> Vec<String> {
        Vec::new()
    }

    /// The first suggested fix.
    fn recovery_suggestion(&self) -> Option<String> {
        self.suggested_fixes().into_iter().next()
    }

    /// The first documentation link.
    fn help_anchor(&self) -> Option<String> {
        self.documentation_links().into_iter().next()
    }

    fn debuggable_help(&self, format: HelpFormat) -> String {
        render_help(self, format)
    }

    fn debug_description(&self) -> String {
        self.debuggable_help(HelpFormat::Long)
    }

    fn short_description(&self) -> String {
        self.debuggable_help(HelpFormat::Short)
    }
}

/**
Captures the current stack as one string per line.

Call it from the error's constructor and return the result from
[`Debuggable::stack_trace`]. Capturing is unconditional, regardless of
`RUST_BACKTRACE`.
*/
pub fn make_stack_trace() -> Vec<String> {
    Backtrace::force_capture()
        .to_string()
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Formats items as `\n- item` each.
pub fn bulleted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\n- {}", item.as_ref()))
        .collect()
}

fn render_help<D: Debuggable + ?Sized>(error: &D, format: HelpFormat) -> String {
    let mut parts: Vec<String> = Vec::new();
    let reason = error.reason();

    parts.push(match format {
        HelpFormat::Long => format!(
            "⚠️ {}: {}\n- id: {}",
            error.readable_name(),
            reason,
            error.full_identifier()
        ),
        HelpFormat::Short => format!("⚠️ [{}: {}]", error.full_identifier(), reason),
    });

    if let Some(source) = error.source_location() {
        match format {
            HelpFormat::Long => {
                let mut lines = vec![
                    format!("File: {}", source.file),
                    format!(" - func: {}", source.function),
                    format!(" - line: {}", source.line),
                    format!(" - column: {}", source.column),
                ];
                if let Some((start, end)) = source.range {
                    lines.push(format!(" - range: {start}..{end}"));
                }
                parts.push(lines.join("\n"));
            }
            HelpFormat::Short => parts.push(format!("[{source}]")),
        }
    }

    match format {
        HelpFormat::Long => {
            let sections = [
                ("Here are some possible causes:", error.possible_causes()),
                ("These suggestions could address the issue:", error.suggested_fixes()),
                ("The documentation talks about this:", error.documentation_links()),
                ("These Stack Overflow links might be helpful:", error.stack_overflow_questions()),
                ("See these GitHub issues for discussion on this topic:", error.github_issues()),
            ];
            for (heading, items) in sections {
                if !items.is_empty() {
                    parts.push(format!("{heading} {}", bulleted_list(&items)));
                }
            }
            parts.join("\n\n") + "\n"
        }
        HelpFormat::Short => {
            let causes = error.possible_causes();
            if !causes.is_empty() {
                parts.push(format!("[Possible causes: {}]", causes.join(" ")));
            }
            let fixes = error.suggested_fixes();
            if !fixes.is_empty() {
                parts.push(format!("[Suggested fixes: {}]", fixes.join(" ")));
            }
            parts.join(" ")
        }
    }
}
