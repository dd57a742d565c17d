/*!
Core emitter instance - owns the registry, the leak guard and the diagnostic sink.

# Module Structure

- `mod.rs` - `EventEmitter` struct, construction, lock helpers
- `registry.rs` - per-name persistent and once sequences, snapshots
- `subscriptions.rs` - `on()`, `once()`, `newListener` notification
- `dispatch.rs` - `emit()`
- `leak_guard.rs` - ceiling check and one-time warning
- `queries.rs` - `listener_count()`, `listeners()`, ceiling getters/setters

# Locking

Registry and guard locks are only held for short copy/update sections and are
never held while a handler or sink runs. Handlers can therefore call back into
the emitter (register, emit, query) from inside a dispatch.

# Example

```
use emitter::{Arg, EventEmitter, Handler};

let emitter = EventEmitter::new();
emitter.on("greet", Handler::from_fn(|args| {
  assert_eq!(args[0].as_str(), Some("hello"));
}))?;

assert!(emitter.emit("greet", &[Arg::from("hello")])?);
assert!(!emitter.emit("nobody-listens", &[])?);
# Ok::<(), emitter::EmitterError>(())
```
*/

mod dispatch;
mod leak_guard;
mod queries;
mod registry;
mod subscriptions;

pub(crate) use leak_guard::LeakGuard;
pub(crate) use registry::{ListenerKind, Registry};

use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::types::{default_max_listeners, MaxListeners};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// In-process event listener registry.
///
/// Clone is cheap (Arc bumps) and yields a handle to the same registry, so a
/// handler can capture a clone to re-enter the emitter while it is being
/// dispatched.
pub struct EventEmitter {
  registry: Arc<RwLock<Registry>>,
  guard: Arc<Mutex<LeakGuard>>,
  sink: Arc<dyn DiagnosticSink>,
}

impl Clone for EventEmitter {
  fn clone(&self) -> Self {
    Self {
      registry: Arc::clone(&self.registry),
      guard: Arc::clone(&self.guard),
      sink: Arc::clone(&self.sink),
    }
  }
}

impl fmt::Debug for EventEmitter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EventEmitter")
      .field("event_names", &self.event_names())
      .field("max_listeners", &self.max_listeners())
      .finish_non_exhaustive()
  }
}

impl Default for EventEmitter {
  fn default() -> Self {
    Self::new()
  }
}

/// Builder for configuring an emitter.
///
/// # Example
///
/// ```
/// use emitter::{EventEmitter, MaxListeners, MaxListenersWarning};
///
/// let emitter = EventEmitter::builder()
///   .max_listeners(MaxListeners::Limit(50))
///   .diagnostics(|warning: &MaxListenersWarning| eprintln!("{warning}"))
///   .build();
/// assert_eq!(emitter.max_listeners(), MaxListeners::Limit(50));
/// ```
#[derive(Default, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct EmitterBuilder {
  max_listeners: Option<MaxListeners>,
  sink: Option<Arc<dyn DiagnosticSink>>,
}

impl fmt::Debug for EmitterBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EmitterBuilder")
      .field("max_listeners", &self.max_listeners)
      .field("custom_sink", &self.sink.is_some())
      .finish()
  }
}

impl EmitterBuilder {
  /// Set this emitter's ceiling. Default: the process-wide default at `build()` time.
  pub fn max_listeners(mut self, max: impl Into<MaxListeners>) -> Self {
    self.max_listeners = Some(max.into());
    self
  }

  /// Route leak warnings to `sink`. Default: [`LogSink`].
  pub fn diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
    self.sink = Some(Arc::new(sink));
    self
  }

  /// Build the emitter.
  pub fn build(self) -> EventEmitter {
    let max_listeners = self.max_listeners.unwrap_or_else(default_max_listeners);
    let sink = self.sink.unwrap_or_else(|| Arc::new(LogSink));
    log::debug!("emitter created (max listeners: {max_listeners})");

    EventEmitter {
      registry: Arc::new(RwLock::new(Registry::new())),
      guard: Arc::new(Mutex::new(LeakGuard::new(max_listeners))),
      sink,
    }
  }
}

impl EventEmitter {
  /// Create an empty emitter with the process-wide default ceiling.
  pub fn new() -> Self {
    Self::builder().build()
  }

  /// Create a builder for configuring a new emitter.
  pub fn builder() -> EmitterBuilder {
    EmitterBuilder::default()
  }

  /// Read the registry. Never invoke handlers inside the closure.
  #[inline]
  pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.registry.read())
  }

  /// Write the registry. Never invoke handlers inside the closure.
  #[inline]
  pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.registry.write())
  }
}
