// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fan-out logger.
//!
//! A [`Dispatcher`] owns an ordered list of [`Sink`]s and, for each log call, decides
//! which of them receive it. The decision has two tiers:
//!
//! 1. The dispatcher's own floor. A call that fails it touches no sink and submits no work.
//!    A context-bearing call must also match the dispatcher's context filter.
//! 2. Per sink: it must be enabled, its own floor must allow the level, and a
//!    context-bearing call must match its context filter.
//!
//! Every selected sink gets one unit of work on the dispatcher's [`ExecutionQueue`]. The
//! call returns once all units are submitted; rendering happens inside the queue.
//!
//! # Registration
//!
//! Sinks are keyed by name, but names are not unique:
//!
//! - [`Dispatcher::add`] appends, duplicates included.
//! - [`Dispatcher::remove`] strips *every* sink with a matching name.
//! - [`Dispatcher::enable`] toggles only the *last* matching sink.
//!
//! Unmatched names are silently ignored by both.
//!
//! ```
//! use debuggable::{Dispatcher, ImmediateQueue, InMemorySink, LogContext, Severity};
//! use std::sync::Arc;
//!
//! let dispatcher = Dispatcher::builder("app")
//!     .enable(true)
//!     .min_level(Severity::Verbose)
//!     .queue(Arc::new(ImmediateQueue))
//!     .build();
//! let sink = Arc::new(InMemorySink::new("memory", Severity::Warning));
//! dispatcher.add(sink.clone());
//!
//! dispatcher.warning("cache is cold");
//! dispatcher.warning_in("rejected", &LogContext::new("auth"));
//! dispatcher.enable(false, "memory");
//! dispatcher.info("not delivered");
//!
//! let logs = sink.drain_logs();
//! assert!(logs.contains("cache is cold"));
//! assert!(logs.contains("[auth]"));
//! assert!(!logs.contains("not delivered"));
//! ```

use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::context::LogContext;
use crate::debuggable::{Debuggable, HelpFormat};
use crate::factory::DispatcherBuilder;
use crate::log_record::{LogRecord, Message};
use crate::queue::{ExecutionQueue, Priority, WorkFlags};
use crate::severity::Severity;
use crate::sink::Sink;
use crate::source_location::SourceLocation;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Fans log calls out to registered sinks through an execution queue.
///
/// All methods take `&self`; share a dispatcher across threads with `Arc`.
pub struct Dispatcher {
    name: String,
    enabled: AtomicBool,
    min_level: Severity,
    bundle_identifier: Option<String>,
    queue: Arc<dyn ExecutionQueue>,
    services: RwLock<Vec<Arc<dyn Sink>>>,
    log_contexts: Vec<LogContext>,
    colors: Option<ColorConfiguration>,
    descriptions: Option<DescriptionConfiguration>,
}

/// Generates a fixed-level shorthand and its context-bearing variant.
macro_rules! shorthand {
    ($level:expr, $plain:ident, $scoped:ident) => {
        #[doc = concat!("Logs `message` at [`", stringify!($level), "`].")]
        #[track_caller]
        pub fn $plain(&self, message: impl Into<Message>) {
            self.log_at(SourceLocation::caller(), $level, None, message);
        }

        #[doc = concat!("Logs `message` at [`", stringify!($level), "`] within `context`.")]
        #[track_caller]
        pub fn $scoped(&self, message: impl Into<Message>, context: &LogContext) {
            self.log_at(SourceLocation::caller(), $level, Some(context), message);
        }
    };
}

impl Dispatcher {
    /// Starts a [`DispatcherBuilder`] with the factory defaults.
    pub fn builder(name: impl Into<String>) -> DispatcherBuilder {
        DispatcherBuilder::new(name)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        enabled: bool,
        min_level: Severity,
        bundle_identifier: Option<String>,
        queue: Arc<dyn ExecutionQueue>,
        services: Vec<Arc<dyn Sink>>,
        log_contexts: Vec<LogContext>,
        colors: Option<ColorConfiguration>,
        descriptions: Option<DescriptionConfiguration>,
    ) -> Self {
        Self {
            name,
            enabled: AtomicBool::new(enabled),
            min_level,
            bundle_identifier,
            queue,
            services: RwLock::new(services),
            log_contexts,
            colors,
            descriptions,
        }
    }

    /**
    Appends `sink`. Duplicate names are allowed.

    Adding a dispatcher to itself is ignored. Longer cycles (a inside b inside a) are not
    detected and recurse forever on the first log call.
    */
    pub fn add(&self, sink: Arc<dyn Sink>) {
        if std::ptr::addr_eq(Arc::as_ptr(&sink), self as *const Dispatcher) {
            return;
        }
        self.services
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    /// Removes every registered sink named like `sink`.
    pub fn remove(&self, sink: &dyn Sink) {
        self.remove_named(sink.name());
    }

    /// Removes every registered sink called `name`. No-op if there is none.
    pub fn remove_named(&self, name: &str) {
        self.services
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| s.name() != name);
    }

    /// Sets the enabled flag of the last registered sink called `name`. No-op if there is none.
    pub fn enable(&self, value: bool, name: &str) {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(sink) = services.iter().rev().find(|s| s.name() == name) {
            sink.set_enabled(value);
        }
    }

    /// A snapshot of the registered sinks in insertion order.
    pub fn services(&self) -> Vec<Arc<dyn Sink>> {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn queue(&self) -> &Arc<dyn ExecutionQueue> {
        &self.queue
    }

    /**
    Logs `message` at `level`.

    The location comes from `#[track_caller]`, which knows the caller's file, line and
    column but not its function, so the function slot of the rendered line stays empty.
    The [`log!`](crate::log!) family of macros fills it in, as does [`Dispatcher::log_at`]
    with a location from [`source_location!`](crate::source_location!).
    */
    #[track_caller]
    pub fn log(&self, message: impl Into<Message>, level: Severity) {
        self.log_at(SourceLocation::caller(), level, None, message);
    }

    /// Logs `message` at `level`, delivered only to sinks interested in `context`.
    #[track_caller]
    pub fn log_in(&self, message: impl Into<Message>, level: Severity, context: &LogContext) {
        self.log_at(SourceLocation::caller(), level, Some(context), message);
    }

    shorthand!(Severity::Error, error, error_in);
    shorthand!(Severity::Info, info, info_in);
    shorthand!(Severity::Debug, debug, debug_in);
    shorthand!(Severity::Verbose, verbose, verbose_in);
    shorthand!(Severity::Warning, warning, warning_in);
    shorthand!(Severity::FatalError, fatal_error, fatal_error_in);

    /// Logs the long help of `error` at [`Severity::Error`].
    ///
    /// Uses the error's own source location when it has one.
    #[track_caller]
    pub fn log_debuggable(&self, error: &dyn Debuggable) {
        if !self.would_log(Severity::Error, None) {
            return;
        }
        // called directly so track_caller reaches our caller
        let location = match error.source_location() {
            Some(location) => location,
            None => SourceLocation::caller(),
        };
        let help = error.debuggable_help(HelpFormat::Long);
        self.log_at(location, Severity::Error, None, help);
    }

    /**
    Whether a call at `level` (and `context`, if any) would reach at least one sink.

    Cheap; lets callers skip building a message that nobody would receive.
    */
    pub fn would_log(&self, level: Severity, context: Option<&LogContext>) -> bool {
        if !self.passes_own_gate(level, context) {
            return false;
        }
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|sink| selects(sink.as_ref(), level, context))
    }

    /**
    The full-control entry point the other `log*` methods forward to.

    `location` is used as-is, so callers that captured one themselves (macros, bridges,
    nested dispatchers) keep it.
    */
    pub fn log_at(
        &self,
        location: SourceLocation,
        level: Severity,
        context: Option<&LogContext>,
        message: impl Into<Message>,
    ) {
        if !self.passes_own_gate(level, context) {
            return;
        }
        let selected: Vec<Arc<dyn Sink>> = self
            .services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|sink| selects(sink.as_ref(), level, context))
            .cloned()
            .collect();
        if selected.is_empty() {
            return;
        }

        let mut record = LogRecord::new(level, message, location);
        if let Some(context) = context {
            record = record.with_context(context.clone());
        }
        for sink in selected {
            let record = record.clone();
            self.queue.submit(
                None,
                Priority::Default,
                WorkFlags::DETACHED,
                Box::new(move || sink.log(&record)),
            );
        }
    }

    fn passes_own_gate(&self, level: Severity, context: Option<&LogContext>) -> bool {
        self.min_level.allows(level)
            && context.is_none_or(|context| context.matches(&self.log_contexts))
    }
}

fn selects(sink: &dyn Sink, level: Severity, context: Option<&LogContext>) -> bool {
    sink.is_enabled()
        && sink.is_allowed_to_log(level)
        && context.is_none_or(|context| sink.should_log(context))
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services: Vec<String> = self
            .services()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("enabled", &self.is_enabled())
            .field("min_level", &self.min_level)
            .field("bundle_identifier", &self.bundle_identifier)
            .field("services", &services)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

/// A dispatcher nested inside another acts like any other sink.
///
/// Its enabled flag only matters to the outer dispatcher; calling a dispatcher's own
/// `log*` methods never consults it.
impl Sink for Dispatcher {
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

    fn log(&self, record: &LogRecord) {
        self.log_at(
            record.location().clone(),
            record.level(),
            record.context(),
            record.raw_message().clone(),
        );
    }
}

/*
Boilerplate notes.

Clone: no.  A clone would need either a shared list (then it's just an Arc) or a copied
list (then enable/remove on one silently diverge from the other).
PartialEq/Hash: no meaningful identity beyond the name.
Default: no, see DispatcherBuilder for defaults.
Send/Sync: yes, required to share through Arc and to nest as a Sink.
*/
