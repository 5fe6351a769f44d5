// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of [`Dispatcher`]s.
//!
//! [`build`] is the one-call form. [`DispatcherBuilder`] covers everything else a
//! dispatcher can be configured with. Both start from the same defaults:
//!
//! | Setting             | Default                                           |
//! |---------------------|---------------------------------------------------|
//! | enabled             | `false`                                           |
//! | floor               | [`Severity::Disabled`], so nothing is emitted     |
//! | queue               | [`ConcurrentQueue`] on the rayon global pool      |
//! | bundle identifier   | [`bundle_identifier()`]                            |
//! | glyphs              | [`DescriptionConfiguration::default()`]           |
//! | colors              | none                                              |
//! | context filter      | empty, meaning every context                      |
//!
//! A disabled floor is deliberate: a dispatcher built without a floor stays silent until
//! one is chosen. For deployments the floor usually comes from the environment:
//!
//! ```
//! use debuggable::{Dispatcher, Severity};
//!
//! # unsafe { std::env::set_var("MYAPP_LOG_DOC", "warning"); }
//! let dispatcher = Dispatcher::builder("myapp")
//!     .min_level_from_env("MYAPP_LOG_DOC")
//!     .expect("valid severity")
//!     .build();
//! assert_eq!(debuggable::Sink::min_level(&dispatcher), Severity::Warning);
//! ```

use crate::configuration::{ColorConfiguration, DescriptionConfiguration};
use crate::context::LogContext;
use crate::dispatcher::Dispatcher;
use crate::queue::{ConcurrentQueue, ExecutionQueue};
use crate::severity::{ParseSeverityError, Severity};
use crate::sink::Sink;
use std::sync::{Arc, OnceLock};

/**
Builds a dispatcher from the five core settings.

`None` picks the default for the queue and the bundle identifier.

```
use debuggable::{ImmediateQueue, Severity, factory};
use std::sync::Arc;

let dispatcher = factory::build("app", true, Severity::Info, Some(Arc::new(ImmediateQueue)), None);
assert!(dispatcher.is_empty());
```
*/
pub fn build(
    name: impl Into<String>,
    enable: bool,
    min_level: Severity,
    queue: Option<Arc<dyn ExecutionQueue>>,
    bundle_identifier: Option<String>,
) -> Dispatcher {
    let mut builder = DispatcherBuilder::new(name).enable(enable).min_level(min_level);
    if let Some(queue) = queue {
        builder = builder.queue(queue);
    }
    if let Some(bundle_identifier) = bundle_identifier {
        builder = builder.bundle_identifier(bundle_identifier);
    }
    builder.build()
}

/// Identifies the hosting application: the file stem of the running executable.
///
/// Read once per process.
pub fn bundle_identifier() -> Option<String> {
    static BUNDLE: OnceLock<Option<String>> = OnceLock::new();
    BUNDLE
        .get_or_init(|| {
            let exe = std::env::current_exe().ok()?;
            exe.file_stem()?.to_str().map(str::to_string)
        })
        .clone()
}

/// Step-by-step configuration of a [`Dispatcher`].
#[derive(Debug)]
pub struct DispatcherBuilder {
    name: String,
    enable: bool,
    min_level: Severity,
    queue: Option<Arc<dyn ExecutionQueue>>,
    bundle_identifier: Option<String>,
    services: Vec<Arc<dyn Sink>>,
    log_contexts: Vec<LogContext>,
    colors: Option<ColorConfiguration>,
    descriptions: Option<DescriptionConfiguration>,
}

impl DispatcherBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable: false,
            min_level: Severity::Disabled,
            queue: None,
            bundle_identifier: bundle_identifier(),
            services: Vec::new(),
            log_contexts: Vec::new(),
            colors: None,
            descriptions: Some(DescriptionConfiguration::default()),
        }
    }

    /// The enabled flag, consulted only when the dispatcher is nested as a sink.
    pub fn enable(mut self, value: bool) -> Self {
        self.enable = value;
        self
    }

    pub fn min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    /**
    Reads the floor from the environment variable `var`.

    An unset variable keeps the current floor. A set variable must name a [`Severity`].
    */
    pub fn min_level_from_env(mut self, var: &str) -> Result<Self, ParseSeverityError> {
        if let Some(value) = std::env::var_os(var) {
            self.min_level = value.to_string_lossy().parse()?;
        }
        Ok(self)
    }

    pub fn queue(mut self, queue: Arc<dyn ExecutionQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn bundle_identifier(mut self, bundle_identifier: impl Into<String>) -> Self {
        self.bundle_identifier = Some(bundle_identifier.into());
        self
    }

    /// Leaves the bundle tag out of rendered lines.
    pub fn no_bundle_identifier(mut self) -> Self {
        self.bundle_identifier = None;
        self
    }

    /// Registers a sink up front, as [`Dispatcher::add`] would.
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.services.push(sink);
        self
    }

    /// The dispatcher's own context filter.
    pub fn log_contexts(mut self, contexts: impl IntoIterator<Item = LogContext>) -> Self {
        self.log_contexts = contexts.into_iter().collect();
        self
    }

    pub fn color_configuration(mut self, colors: ColorConfiguration) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn description_configuration(mut self, descriptions: Option<DescriptionConfiguration>) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn build(self) -> Dispatcher {
        let queue = self
            .queue
            .unwrap_or_else(|| Arc::new(ConcurrentQueue::new()));
        Dispatcher::from_parts(
            self.name,
            self.enable,
            self.min_level,
            self.bundle_identifier,
            queue,
            self.services,
            self.log_contexts,
            self.colors,
            self.descriptions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_are_silent() {
        let dispatcher = DispatcherBuilder::new("quiet").build();
        assert!(!dispatcher.is_enabled());
        assert_eq!(dispatcher.min_level(), Severity::Disabled);
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.bundle_identifier(), bundle_identifier().as_deref());
        assert!(dispatcher.color_configuration().is_none());
        assert!(dispatcher.description_configuration().is_some());
    }

    #[test]
    fn build_applies_arguments() {
        let dispatcher = build("svc", true, Severity::Warning, None, Some("com.example".into()));
        assert_eq!(dispatcher.name(), "svc");
        assert!(dispatcher.is_enabled());
        assert_eq!(dispatcher.min_level(), Severity::Warning);
        assert_eq!(dispatcher.bundle_identifier(), Some("com.example"));
    }

    #[test]
    fn env_floor() {
        let _guard = ENV_GUARD.lock().unwrap();
        let var = "DEBUGGABLE_FACTORY_TEST_FLOOR";

        // SAFETY: serialized by ENV_GUARD, and nothing else reads this variable
        unsafe { std::env::remove_var(var) };
        let builder = DispatcherBuilder::new("env")
            .min_level(Severity::Info)
            .min_level_from_env(var)
            .unwrap();
        assert_eq!(builder.build().min_level(), Severity::Info);

        unsafe { std::env::set_var(var, "Fatal-Error") };
        let builder = DispatcherBuilder::new("env").min_level_from_env(var).unwrap();
        assert_eq!(builder.build().min_level(), Severity::FatalError);

        unsafe { std::env::set_var(var, "loud") };
        let err = DispatcherBuilder::new("env").min_level_from_env(var).unwrap_err();
        assert_eq!(err.input(), "loud");

        unsafe { std::env::remove_var(var) };
    }
}
