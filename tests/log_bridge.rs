// SPDX-License-Identifier: MIT OR Apache-2.0

// `log` accepts one logger per process, so this file holds a single test.

#[cfg(test)]
mod tests {
    use debuggable::{Dispatcher, ImmediateQueue, InMemorySink, Severity, log_bridge};
    use std::sync::Arc;

    #[test]
    fn log_crate_macros_reach_the_dispatcher() {
        let sink = Arc::new(InMemorySink::new("memory", Severity::Error));
        let dispatcher = Dispatcher::builder("bridge")
            .min_level(Severity::Verbose)
            .queue(Arc::new(ImmediateQueue))
            .sink(sink.clone())
            .build();
        let dispatcher = Arc::new(dispatcher);

        log_bridge::install(dispatcher.clone()).expect("first install");
        assert!(log_bridge::install(dispatcher).is_err());

        log::error!(target: "payments", "card declined");
        log::warn!("retrying");
        log::trace!("too chatty for an Error floor");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines[0].contains("[payments]"));
        assert!(lines[0].contains("[log_bridge.rs]"));
        assert!(lines[0].ends_with("\ncard declined"));
        assert!(lines[1].ends_with("\nretrying"));
    }
}
