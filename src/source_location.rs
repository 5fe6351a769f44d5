// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site locations attached to log calls and errors.
//!
//! Locations are captured at the *caller*, never inside the dispatcher. There are two ways
//! to capture one:
//!
//! - [`SourceLocation::caller`], which relies on `#[track_caller]`. It knows the file,
//!   line and column but not the enclosing function.
//! - The [`source_location!`](crate::source_location!) macro, which also records the
//!   enclosing function path.
//!
//! All `Dispatcher::log*` methods are `#[track_caller]`, so a plain method call records
//! where the user called it.

use std::borrow::Cow;
use std::fmt::Display;
use std::panic::Location;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// File in which this location exists.
    pub file: Cow<'static, str>,
    /// Function in which this location exists. Empty when unknown.
    pub function: Cow<'static, str>,
    /// Line number this location belongs to.
    pub line: u32,
    /// Number of characters into the line this location starts at.
    pub column: u32,
    /// Optional start/end range of the source.
    pub range: Option<(u32, u32)>,
}

impl SourceLocation {
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        function: impl Into<Cow<'static, str>>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
            column,
            range: None,
        }
    }

    /// Returns a copy of this location carrying a source range.
    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.range = Some((start, end));
        self
    }

    /// Returns a copy of this location naming its enclosing function.
    pub fn with_function(mut self, function: impl Into<Cow<'static, str>>) -> Self {
        self.function = function.into();
        self
    }

    /**
    Captures the location of the caller.

    The function name is not available through `#[track_caller]` and is left empty.
    */
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::from(location)
    }

    /// The last path component of [`Self::file`].
    pub fn file_name(&self) -> &str {
        file_basename(&self.file)
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), "", location.line(), location.column())
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)?;
        if let Some((start, end)) = self.range {
            write!(f, " ({}..{})", start, end)?;
        }
        Ok(())
    }
}

/// Strips directories from a path, accepting either separator.
pub(crate) fn file_basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Cleans up a path obtained from `type_name_of_val` on a nested item.
#[doc(hidden)]
pub fn trim_function_path(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__debuggable_here").unwrap_or(path);
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_points_at_the_calling_line() {
        let expected_line = line!() + 1;
        let location = SourceLocation::caller();
        assert_eq!(location.line, expected_line);
        assert!(location.file.ends_with("source_location.rs"));
        assert_eq!(location.function, "");
    }

    #[test]
    fn file_name_strips_directories() {
        let location = SourceLocation::new("src/net/client.rs", "connect", 3, 9);
        assert_eq!(location.file_name(), "client.rs");
        assert_eq!(file_basename(r"C:\work\main.rs"), "main.rs");
        assert_eq!(file_basename("lib.rs"), "lib.rs");
    }

    #[test]
    fn display_includes_range_when_present() {
        let location = SourceLocation::new("a.rs", "f", 1, 2).with_range(4, 8);
        assert_eq!(location.to_string(), "a.rs:1:2 (4..8)");
    }

    #[test]
    fn trims_helper_and_closure_suffixes() {
        assert_eq!(
            trim_function_path("my_crate::run::{{closure}}::__debuggable_here"),
            "my_crate::run"
        );
        assert_eq!(trim_function_path("my_crate::run::{{closure}}::{{closure}}"), "my_crate::run");
    }
}
