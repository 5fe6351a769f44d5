// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named logging contexts.
//!
//! A [`LogContext`] is an opaque tag a caller attaches to a log call, such as
//! `"network"` or `"persistence"`. Dispatchers and sinks may declare the set of
//! contexts they care about; a call tagged with a context outside that set is
//! not delivered to them.
//!
//! Two rules keep the filter predictable:
//!
//! - An empty filter set means "every context".
//! - The empty context (`name == ""`, see [`LogContext::empty`]) means "no
//!   context" and matches every filter.
//!
//! ```
//! use debuggable::LogContext;
//!
//! let network = LogContext::new("network");
//! let filter = [LogContext::new("network"), LogContext::new("ui")];
//!
//! assert!(network.matches(&filter));
//! assert!(!LogContext::new("disk").matches(&filter));
//! assert!(LogContext::empty().matches(&filter));
//! assert!(LogContext::new("disk").matches(&[]));
//! ```

use std::borrow::Cow;
use std::fmt::Display;

/// A named scope for log calls. Equality is by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LogContext {
    name: Cow<'static, str>,
}

impl LogContext {
    /// Creates a context with the given name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a context from a static name, usable in `static` items.
    ///
    /// ```
    /// use debuggable::LogContext;
    /// static NETWORK: LogContext = LogContext::from_static("network");
    /// assert_eq!(NETWORK.name(), "network");
    /// ```
    pub const fn from_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// The distinguished "no context" value.
    pub const fn empty() -> Self {
        Self::from_static("")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /**
    Whether a call tagged with this context passes `filter`.

    True when `filter` is empty, when this is the empty context, or when
    `filter` contains a context with the same name.
    */
    pub fn matches(&self, filter: &[LogContext]) -> bool {
        self.is_empty() || filter.is_empty() || filter.iter().any(|c| c.name == self.name)
    }
}

impl Display for LogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for LogContext {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for LogContext {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for LogContext {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_name() {
        assert_eq!(LogContext::new("net".to_string()), LogContext::from_static("net"));
        assert_ne!(LogContext::new("net"), LogContext::new("disk"));
        assert_eq!(LogContext::default(), LogContext::empty());
    }

    #[test]
    fn empty_context_matches_any_filter() {
        let filter = [LogContext::new("only")];
        assert!(LogContext::empty().matches(&filter));
        assert!(LogContext::empty().matches(&[]));
    }

    #[test]
    fn named_context_must_be_listed_in_non_empty_filter() {
        let filter = [LogContext::new("a"), LogContext::new("b")];
        assert!(LogContext::new("b").matches(&filter));
        assert!(!LogContext::new("c").matches(&filter));
    }
}
