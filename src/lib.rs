//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# debuggable

debuggable is a fan-out logging facade plus a protocol for errors that explain themselves.

# Development status

debuggable is experimental and the API may change.

# The facade

A [`Dispatcher`] holds a list of named [`Sink`]s. Each log call is gated twice:

* once against the dispatcher's own floor (and context filter, for scoped calls), and
* once per sink, against that sink's enabled flag, floor and context filter.

Every sink that survives gets one unit of work on the dispatcher's [`ExecutionQueue`], which
renders the line and writes it out. `log` returns as soon as the work is submitted.

## Levels

| Name          | Rank |
|---------------|------|
| `Disabled`    | 0    |
| `Debug`       | 1    |
| `Info`        | 2    |
| `Warning`     | 3    |
| `Error`       | 4    |
| `FatalError`  | 5    |
| `Verbose`     | 6    |

A floor lets through every level whose rank is at or below its own. So a floor of
`Warning` passes `Debug`, `Info` and `Warning`, and a floor of `Verbose` passes everything.
`Disabled` as a floor passes nothing, and as a level is never emitted.

# The API

```rust
use debuggable::{Dispatcher, ConsoleSink, ColorConfiguration, LogContext, Severity};
use std::sync::Arc;

let dispatcher = Dispatcher::builder("myapp")
    .min_level(Severity::Verbose)
    .build();
dispatcher.add(Arc::new(
    ConsoleSink::new("console", Severity::Error).with_color_configuration(ColorConfiguration::linux()),
));

dispatcher.info("started");
dispatcher.warning_in("slow handshake", &LogContext::new("tls"));
debuggable::error!(dispatcher: dispatcher, "lost {} connections", 3);
```

Macros without a `dispatcher:` log to the [global dispatcher](global_dispatcher), which
prints everything to stdout until replaced.

A line looks like this:

```text
⚠️ [console][myapp][tls][2024-03-09 02:05:07123][main.rs]:[12:5:myapp::connect]
slow handshake
```

# Errors that explain themselves

[`Debuggable`] lets an error type carry an identifier, a reason, its source location and
lists of causes, fixes and links. [`Dispatcher::log_debuggable`] logs the long form.

# Interop

[`log_bridge`] installs a dispatcher as the backend of the `log` crate.
*/

mod configuration;
mod console_sink;
mod context;
mod debuggable;
mod dispatcher;
pub mod factory;
pub mod global_dispatcher;
mod inmemory_sink;
pub mod log_bridge;
mod log_record;
mod macros;
pub mod queue;
pub mod render;
mod severity;
mod sink;
mod source_location;

pub use configuration::{ColorConfiguration, ColorFn, DescriptionConfiguration};
pub use console_sink::ConsoleSink;
pub use context::LogContext;
pub use debuggable::{Debuggable, HelpFormat, bulleted_list, make_stack_trace};
pub use dispatcher::Dispatcher;
pub use factory::DispatcherBuilder;
pub use inmemory_sink::InMemorySink;
pub use log_record::{LogRecord, Message};
pub use queue::{
    ConcurrentQueue, ExecutionQueue, ImmediateQueue, Priority, QueueGroup, SerialQueue, Work,
    WorkFlags,
};
pub use severity::{ParseSeverityError, Severity};
pub use sink::Sink;
pub use source_location::SourceLocation;

#[doc(hidden)]
pub use source_location::trim_function_path as __trim_function_path;
