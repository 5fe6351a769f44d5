// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default dispatcher.
//!
//! The macros log here when no dispatcher is named. By default it is an enabled
//! dispatcher called `"global"` with floor [`Severity::Verbose`] and a single
//! [`ConsoleSink`] called `"console"`, so logging works without configuration.
//!
//! # Examples
//!
//! ## Adding a sink to the default dispatcher
//!
//! ```
//! use debuggable::global_dispatcher::global_dispatcher;
//! use debuggable::{InMemorySink, Severity};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new("memory", Severity::Verbose));
//! global_dispatcher().add(sink.clone());
//! debuggable::info!("goes to the console and to memory");
//! ```
//!
//! ## Replacing it
//!
//! ```
//! use debuggable::global_dispatcher::set_global_dispatcher;
//! use debuggable::{Dispatcher, ImmediateQueue, InMemorySink, Severity};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new("memory", Severity::Verbose));
//! let dispatcher = Dispatcher::builder("tests")
//!     .min_level(Severity::Verbose)
//!     .queue(Arc::new(ImmediateQueue))
//!     .sink(sink.clone())
//!     .build();
//! set_global_dispatcher(Arc::new(dispatcher));
//!
//! debuggable::warning!("only captured in memory");
//! assert!(sink.drain_logs().contains("only captured in memory"));
//! ```
//!
//! # Implementation Notes
//!
//! The current dispatcher is an `Arc` behind an `RwLock`. Callers clone the `Arc` out and
//! release the lock before logging, so replacing the dispatcher never waits on a log
//! call. A dispatcher that was replaced stays alive until the last in-flight call drops
//! its handle.

use crate::console_sink::ConsoleSink;
use crate::dispatcher::Dispatcher;
use crate::severity::Severity;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static GLOBAL_DISPATCHER: OnceLock<RwLock<Arc<Dispatcher>>> = OnceLock::new();

fn default_dispatcher() -> Arc<Dispatcher> {
    let console = Arc::new(ConsoleSink::new("console", Severity::Verbose));
    Arc::new(
        Dispatcher::builder("global")
            .enable(true)
            .min_level(Severity::Verbose)
            .sink(console)
            .build(),
    )
}

fn slot() -> &'static RwLock<Arc<Dispatcher>> {
    GLOBAL_DISPATCHER.get_or_init(|| RwLock::new(default_dispatcher()))
}

/// The current global dispatcher, created with the defaults on first use.
pub fn global_dispatcher() -> Arc<Dispatcher> {
    slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the global dispatcher. Handles obtained earlier keep the old one.
pub fn set_global_dispatcher(dispatcher: Arc<Dispatcher>) {
    let previous = {
        let mut current = slot().write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, dispatcher)
    };
    // may be the last handle; drop it outside the lock
    drop(previous);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_sink::InMemorySink;
    use crate::queue::ImmediateQueue;
    use crate::sink::Sink;
    use std::sync::Mutex;
    use std::thread;

    static TEST_DISPATCHER_GUARD: Mutex<()> = Mutex::new(());

    fn capturing() -> (Arc<Dispatcher>, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new("memory", Severity::Verbose));
        let dispatcher = Dispatcher::builder("captured")
            .min_level(Severity::Verbose)
            .queue(Arc::new(ImmediateQueue))
            .sink(sink.clone())
            .build();
        (Arc::new(dispatcher), sink)
    }

    #[test]
    fn default_shape() {
        let dispatcher = default_dispatcher();
        assert_eq!(dispatcher.name(), "global");
        assert!(dispatcher.is_enabled());
        assert_eq!(dispatcher.min_level(), Severity::Verbose);
        let names: Vec<String> = dispatcher
            .services()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["console".to_string()]);
    }

    #[test]
    fn replace_global() {
        let _guard = TEST_DISPATCHER_GUARD.lock().unwrap();
        let (dispatcher, sink) = capturing();
        set_global_dispatcher(dispatcher.clone());
        assert!(Arc::ptr_eq(&global_dispatcher(), &dispatcher));

        global_dispatcher().info("through the global");
        assert!(sink.drain_logs().contains("through the global"));
    }

    #[test]
    fn concurrent_replace_and_read() {
        let _guard = TEST_DISPATCHER_GUARD.lock().unwrap();
        let (dispatcher, _sink) = capturing();

        let handle = thread::spawn(move || set_global_dispatcher(dispatcher));
        let _ = global_dispatcher();
        handle.join().expect("Thread should complete successfully");

        assert_eq!(global_dispatcher().name(), "captured");
    }
}
