// SPDX-License-Identifier: MIT OR Apache-2.0

//! The payload carried from a log call to each sink.
//!
//! A [`LogRecord`] holds everything a sink needs to render one line: the
//! [`Severity`], an optional [`LogContext`], the caller's [`SourceLocation`] and the
//! [`Message`] body.
//!
//! # Deferred messages
//!
//! Building a message can be expensive, so a [`Message`] may hold a producer instead of
//! text. The producer runs at most once, the first time a sink asks for the text, which
//! normally happens inside a unit of work on the execution queue. When the gate rejects
//! a call, no record is built and the producer never runs.
//!
//! ```rust
//! use debuggable::{LogRecord, Message, Severity, SourceLocation};
//!
//! let message = Message::lazy(|| format!("loaded {} rows", 42));
//! let record = LogRecord::new(Severity::Info, message, SourceLocation::caller());
//! assert_eq!(record.message(), "loaded 42 rows");
//! ```

use crate::context::LogContext;
use crate::severity::Severity;
use crate::source_location::SourceLocation;
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

type Producer = Box<dyn FnOnce() -> String + Send>;

struct Deferred {
    value: OnceLock<String>,
    producer: Mutex<Option<Producer>>,
}

impl Deferred {
    fn get(&self) -> &str {
        self.value.get_or_init(|| {
            let producer = self
                .producer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            producer.map(|p| p()).unwrap_or_default()
        })
    }
}

enum MessageInner {
    Ready(Cow<'static, str>),
    Deferred(Deferred),
}

/**
Message text that is produced at most once.

Cloning a `Message` is cheap and clones share the produced text, so a record fanned
out to several sinks evaluates its producer once.
*/
#[derive(Clone)]
pub struct Message {
    inner: Arc<MessageInner>,
}

impl Message {
    /// A message whose text is computed on first use.
    pub fn lazy<F>(producer: F) -> Self
    where
        F: FnOnce() -> String + Send + 'static,
    {
        Self {
            inner: Arc::new(MessageInner::Deferred(Deferred {
                value: OnceLock::new(),
                producer: Mutex::new(Some(Box::new(producer))),
            })),
        }
    }

    /// The text, running the producer if it has not run yet.
    pub fn as_str(&self) -> &str {
        match &*self.inner {
            MessageInner::Ready(text) => text,
            MessageInner::Deferred(deferred) => deferred.get(),
        }
    }

    /// Whether the text is already available without running a producer.
    pub fn is_evaluated(&self) -> bool {
        match &*self.inner {
            MessageInner::Ready(_) => true,
            MessageInner::Deferred(deferred) => deferred.value.get().is_some(),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self {
            inner: Arc::new(MessageInner::Ready(Cow::Owned(text))),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self {
            inner: Arc::new(MessageInner::Ready(Cow::Borrowed(text))),
        }
    }
}

impl From<Cow<'static, str>> for Message {
    fn from(text: Cow<'static, str>) -> Self {
        Self {
            inner: Arc::new(MessageInner::Ready(text)),
        }
    }
}

impl Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // don't force a deferred producer just to debug-print
        match &*self.inner {
            MessageInner::Ready(text) => f.debug_tuple("Message").field(text).finish(),
            MessageInner::Deferred(deferred) => match deferred.value.get() {
                Some(text) => f.debug_tuple("Message").field(text).finish(),
                None => f.write_str("Message(<deferred>)"),
            },
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
One log call, as handed to a sink.

Records are built by the dispatcher after the gate has passed, then shared by every
unit of work it submits for that call.
*/
#[derive(Debug, Clone)]
pub struct LogRecord {
    level: Severity,
    message: Message,
    context: Option<LogContext>,
    location: SourceLocation,
}

impl LogRecord {
    pub fn new(level: Severity, message: impl Into<Message>, location: SourceLocation) -> Self {
        Self {
            level,
            message: message.into(),
            context: None,
            location,
        }
    }

    /// Tags the record with a context. The empty context is stored as no context.
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = if context.is_empty() { None } else { Some(context) };
        self
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// The message text. Runs a deferred producer on first call.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn raw_message(&self) -> &Message {
        &self.message
    }

    pub fn context(&self) -> Option<&LogContext> {
        self.context.as_ref()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug: Derived - Message's Debug never forces a deferred producer
- Clone: Derived - cheap, the message is Arc-shared

NOT IMPLEMENTED:
- PartialEq/Eq/Hash: comparing would force deferred messages
- Default: a record without a location or level is meaningless
- Display: rendering depends on the sink (name, bundle, tables), see render.rs
*/

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn deferred_message_runs_once_across_clones() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let message = Message::lazy(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            "expensive".to_string()
        });
        let copy = message.clone();
        assert!(!message.is_evaluated());
        assert_eq!(copy.as_str(), "expensive");
        assert_eq!(message.as_str(), "expensive");
        assert!(message.is_evaluated());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_does_not_force_producer() {
        let message = Message::lazy(|| panic!("must not run"));
        assert_eq!(format!("{:?}", message), "Message(<deferred>)");
    }

    #[test]
    fn empty_context_is_dropped() {
        let record = LogRecord::new(Severity::Info, "hi", SourceLocation::caller())
            .with_context(LogContext::empty());
        assert!(record.context().is_none());
        let record = record.with_context(LogContext::new("net"));
        assert_eq!(record.context().map(LogContext::name), Some("net"));
    }
}
