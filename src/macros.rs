// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! The macros are the call-site front end to a [`Dispatcher`](crate::Dispatcher). Compared
//! with calling the dispatcher methods directly they add two things:
//!
//! - The enclosing function's path is captured along with file, line and column, see
//!   [`source_location!`](crate::source_location!).
//! - Formatting is skipped entirely when the call would reach no sink, see
//!   [`Dispatcher::would_log`](crate::Dispatcher::would_log).
//!
//! # Forms
//!
//! Every level macro accepts the same four forms. `dispatcher:` defaults to the
//! [global dispatcher](crate::global_dispatcher) and `context:` to no context.
//!
//! ```rust
//! use debuggable::{Dispatcher, ImmediateQueue, InMemorySink, LogContext, Severity};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new("memory", Severity::Verbose));
//! let app = Dispatcher::builder("app")
//!     .min_level(Severity::Verbose)
//!     .queue(Arc::new(ImmediateQueue))
//!     .sink(sink.clone())
//!     .build();
//! let net = LogContext::new("net");
//!
//! debuggable::info!("to the global dispatcher");
//! debuggable::info!(context: net, "to the global dispatcher, scoped");
//! debuggable::info!(dispatcher: app, "retrying in {}s", 5);
//! debuggable::warning!(dispatcher: app, context: net, "socket closed by {peer}", peer = "10.0.0.2");
//! debuggable::log!(dispatcher: app, Severity::Debug, "explicit level");
//!
//! let logs = sink.drain_logs();
//! assert!(logs.contains("retrying in 5s"));
//! assert!(logs.contains("[net]"));
//! assert!(logs.contains("socket closed by 10.0.0.2"));
//! ```

/// The path of the enclosing function, e.g. `my_crate::server::run`.
///
/// Closures are reported as their enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __debuggable_here() {}
        $crate::__trim_function_path(::std::any::type_name_of_val(&__debuggable_here))
    }};
}

/**
A [`SourceLocation`](crate::SourceLocation) for the place the macro is written, including
the enclosing function.

```rust
fn handler() -> debuggable::SourceLocation {
    debuggable::source_location!()
}
let location = handler();
assert!(location.function.ends_with("handler"));
assert!(location.file.ends_with(".rs"));
```
*/
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::SourceLocation::new(
            ::std::file!(),
            $crate::function_name!(),
            ::std::line!(),
            ::std::column!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __debuggable_log {
    ($dispatcher:expr, $level:expr, $context:expr, $($arg:tt)+) => {{
        let __dispatcher = &$dispatcher;
        let __level: $crate::Severity = $level;
        let __context: ::std::option::Option<&$crate::LogContext> = $context;
        if __dispatcher.would_log(__level, __context) {
            __dispatcher.log_at(
                $crate::source_location!(),
                __level,
                __context,
                ::std::format!($($arg)+),
            );
        }
    }};
}

/// Logs at an explicit [`Severity`](crate::Severity).
///
/// ```rust
/// debuggable::log!(debuggable::Severity::Info, "{} rows", 3);
/// ```
#[macro_export]
macro_rules! log {
    (dispatcher: $dispatcher:expr, context: $context:expr, $level:expr, $($arg:tt)+) => {{
        let __scope: &$crate::LogContext = &$context;
        $crate::__debuggable_log!($dispatcher, $level, ::std::option::Option::Some(__scope), $($arg)+)
    }};
    (dispatcher: $dispatcher:expr, $level:expr, $($arg:tt)+) => {
        $crate::__debuggable_log!($dispatcher, $level, ::std::option::Option::None, $($arg)+)
    };
    (context: $context:expr, $level:expr, $($arg:tt)+) => {{
        let __scope: &$crate::LogContext = &$context;
        $crate::__debuggable_log!(
            $crate::global_dispatcher::global_dispatcher(),
            $level,
            ::std::option::Option::Some(__scope),
            $($arg)+
        )
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::__debuggable_log!(
            $crate::global_dispatcher::global_dispatcher(),
            $level,
            ::std::option::Option::None,
            $($arg)+
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __debuggable_level {
    ($level:expr, dispatcher: $dispatcher:expr, context: $context:expr, $($arg:tt)+) => {
        $crate::log!(dispatcher: $dispatcher, context: $context, $level, $($arg)+)
    };
    ($level:expr, dispatcher: $dispatcher:expr, $($arg:tt)+) => {
        $crate::log!(dispatcher: $dispatcher, $level, $($arg)+)
    };
    ($level:expr, context: $context:expr, $($arg:tt)+) => {
        $crate::log!(context: $context, $level, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::log!($level, $($arg)+)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error).
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::Error, $($arg)+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info).
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::Info, $($arg)+)
    };
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::Debug, $($arg)+)
    };
}

/// Logs at [`Severity::Verbose`](crate::Severity::Verbose).
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::Verbose, $($arg)+)
    };
}

/// Logs at [`Severity::Warning`](crate::Severity::Warning).
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::Warning, $($arg)+)
    };
}

/// Logs at [`Severity::FatalError`](crate::Severity::FatalError).
///
/// Only logs. Whether to abort afterwards is up to the caller.
#[macro_export]
macro_rules! fatal_error {
    ($($arg:tt)+) => {
        $crate::__debuggable_level!($crate::Severity::FatalError, $($arg)+)
    };
}
