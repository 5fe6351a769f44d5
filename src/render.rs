// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference rendering of a [`LogRecord`] into one output line.
//!
//! The layout is:
//!
//! ```text
//! <glyph> [<sink>][<bundle>][<context>][<timestamp>][<file>]:[<line>:<column>:<function>]
//! <message>
//! ```
//!
//! Optional pieces are left out, brackets and all: the glyph when the description
//! table has no entry, the bundle identifier when there is none, and the context when
//! the record carries none. When a color configuration is supplied the whole line is
//! passed through the color function for the record's level.

use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::log_record::LogRecord;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// chrono spelling of `yyyy-MM-dd hh:mm:ssSSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S%3f";

/// Formats a timestamp the way rendered lines show it.
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Everything about the emitting sink that shows up in a line.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle<'a> {
    pub sink_name: &'a str,
    pub bundle_identifier: Option<&'a str>,
    pub descriptions: Option<&'a DescriptionConfiguration>,
    pub colors: Option<&'a ColorConfiguration>,
}

/// Renders `record` with the current local time.
pub fn render_line(style: &LineStyle<'_>, record: &LogRecord) -> String {
    render_line_at(style, record, &Local::now())
}

/// Renders `record` as if it were logged at `time`.
pub fn render_line_at(style: &LineStyle<'_>, record: &LogRecord, time: &DateTime<Local>) -> String {
    let level = record.level();
    let location = record.location();
    let mut line = String::new();

    let glyph = style
        .descriptions
        .map(|d| d.description(level))
        .unwrap_or("");
    if !glyph.is_empty() {
        line.push_str(glyph);
        line.push(' ');
    }

    // writing into a String cannot fail
    let _ = write!(line, "[{}]", style.sink_name);
    if let Some(bundle) = style.bundle_identifier {
        let _ = write!(line, "[{}]", bundle);
    }
    if let Some(context) = record.context().filter(|c| !c.is_empty()) {
        let _ = write!(line, "[{}]", context.name());
    }
    let _ = write!(
        line,
        "[{}][{}]:[{}:{}:{}]\n{}",
        format_timestamp(time),
        location.file_name(),
        location.line,
        location.column,
        location.function,
        record.message()
    );

    match style.colors {
        Some(colors) => colors.apply(level, &line),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogContext, Severity, SourceLocation};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("unambiguous local time")
    }

    fn record() -> LogRecord {
        LogRecord::new(
            Severity::Warning,
            "disk almost full",
            SourceLocation::new("src/storage/disk.rs", "storage::check", 12, 5),
        )
    }

    #[test]
    fn renders_every_field() {
        let descriptions = DescriptionConfiguration::default();
        let style = LineStyle {
            sink_name: "console",
            bundle_identifier: Some("com.example.app"),
            descriptions: Some(&descriptions),
            colors: None,
        };
        let record = record().with_context(LogContext::new("storage"));
        let line = render_line_at(&style, &record, &fixed_time());
        assert_eq!(
            line,
            "⚠️ [console][com.example.app][storage][2024-03-09 02:05:07000][disk.rs]:[12:5:storage::check]\ndisk almost full"
        );
    }

    #[test]
    fn omits_absent_optional_fields() {
        let style = LineStyle {
            sink_name: "console",
            bundle_identifier: None,
            descriptions: None,
            colors: None,
        };
        let line = render_line_at(&style, &record(), &fixed_time());
        assert!(line.starts_with("[console][2024-03-09 02:05:07000]"), "{line}");
    }

    #[test]
    fn color_wraps_the_whole_line() {
        let colors = ColorConfiguration::linux();
        let style = LineStyle {
            sink_name: "console",
            bundle_identifier: None,
            descriptions: None,
            colors: Some(&colors),
        };
        let line = render_line_at(&style, &record(), &fixed_time());
        assert!(line.starts_with("\u{1b}[0;33m[console]"));
        assert!(line.ends_with("disk almost full\u{1b}[0m"));
    }
}
