/*!
Listener registration: `on()` and `once()`.

Each registration notifies `newListener` first, then appends, then runs the
leak guard. The notification runs with no lock held, so its handlers may
register further listeners; the one being added cannot observe itself.
*/

use super::{EventEmitter, ListenerKind};
use crate::types::{Arg, EmitterError, EmitterResult, EventName, Handler, NEW_LISTENER};

impl EventEmitter {
  /// Register a handler invoked on every emission of `name`.
  ///
  /// Always returns `Ok(true)` once registered. Fails if `name` is empty or
  /// a `newListener` handler fails, in which case nothing is registered.
  pub fn on(&self, name: impl Into<EventName>, handler: impl Into<Handler>) -> EmitterResult<bool> {
    self.register(name.into(), handler.into(), ListenerKind::Persistent)
  }

  /// Alias for [`EventEmitter::on`].
  pub fn add_listener(
    &self,
    name: impl Into<EventName>,
    handler: impl Into<Handler>,
  ) -> EmitterResult<bool> {
    self.on(name, handler)
  }

  /// Register a handler invoked on the next emission of `name` only.
  pub fn once(&self, name: impl Into<EventName>, handler: impl Into<Handler>) -> EmitterResult<bool> {
    self.register(name.into(), handler.into(), ListenerKind::Once)
  }

  fn register(&self, name: EventName, handler: Handler, kind: ListenerKind) -> EmitterResult<bool> {
    if name.is_empty() {
      return Err(EmitterError::InvalidArgument(
        "event name must not be empty".to_string(),
      ));
    }

    self.emit(
      NEW_LISTENER,
      &[Arg::Name(name.clone()), Arg::Handler(handler.clone())],
    )?;

    let count = self.write(|r| r.register(name.clone(), handler, kind));
    log::trace!("registered {kind} listener for '{name}' ({count} total)");

    self.check_listener_count(&name, count);
    Ok(true)
  }
}
