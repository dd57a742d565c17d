/*! Introspection and ceiling configuration. */

use super::EventEmitter;
use crate::types::{EventName, Handler, MaxListeners};

impl EventEmitter {
  /// Number of handlers (persistent and once) registered for `name`.
  pub fn listener_count(&self, name: impl AsRef<str>) -> usize {
    self.read(|r| r.count_for(name.as_ref()))
  }

  /// Copy of the handlers for `name`: persistent first, then once, both in
  /// registration order. Empty for unknown names.
  pub fn listeners(&self, name: impl AsRef<str>) -> Vec<Handler> {
    self.read(|r| r.snapshot_for(name.as_ref()))
  }

  /// Names with at least one handler, in first-registration order.
  pub fn event_names(&self) -> Vec<EventName> {
    self.read(super::Registry::event_names)
  }

  /// This emitter's ceiling.
  pub fn max_listeners(&self) -> MaxListeners {
    self.guard.lock().max_listeners()
  }

  /// Replace this emitter's ceiling and return the new value.
  ///
  /// An emitter that already warned stays silent.
  pub fn set_max_listeners(&self, max: impl Into<MaxListeners>) -> MaxListeners {
    let max = max.into();
    self.guard.lock().set_max_listeners(max);
    log::debug!("max listeners set to {max}");
    max
  }

  /// Whether the leak warning has already fired for this emitter.
  pub fn has_warned(&self) -> bool {
    self.guard.lock().warned()
  }
}

#[cfg(test)]
mod tests {
  use crate::{EventEmitter, EventName, Handler, MaxListeners};

  fn noop() -> Handler {
    Handler::from_fn(|_| {})
  }

  #[test]
  fn unknown_names_are_empty() {
    let emitter = EventEmitter::new();
    assert_eq!(emitter.listener_count("missing"), 0);
    assert!(emitter.listeners("missing").is_empty());
  }

  #[test]
  fn count_includes_both_kinds() {
    let emitter = EventEmitter::new();
    emitter.on("e", noop()).unwrap();
    emitter.once("e", noop()).unwrap();
    emitter.once("e", noop()).unwrap();
    assert_eq!(emitter.listener_count("e"), 3);
    assert_eq!(emitter.listener_count(EventName::from("e")), 3);
  }

  #[test]
  fn listeners_copy_is_not_live() {
    let emitter = EventEmitter::new();
    emitter.on("e", noop()).unwrap();
    let copy = emitter.listeners("e");
    emitter.on("e", noop()).unwrap();
    assert_eq!(copy.len(), 1);
    assert_eq!(emitter.listeners("e").len(), 2);
  }

  #[test]
  fn event_names_drop_names_whose_once_handlers_fired() {
    let emitter = EventEmitter::new();
    emitter.on("kept", noop()).unwrap();
    emitter.once("fired", noop()).unwrap();

    emitter.emit("fired", &[]).unwrap();

    assert_eq!(emitter.event_names(), vec![EventName::from("kept")]);
  }

  #[test]
  fn set_max_listeners_echoes_value() {
    let emitter = EventEmitter::new();
    assert_eq!(emitter.set_max_listeners(25_usize), MaxListeners::Limit(25));
    assert_eq!(emitter.max_listeners(), MaxListeners::Limit(25));
    assert_eq!(
      emitter.set_max_listeners(MaxListeners::Unlimited),
      MaxListeners::Unlimited
    );
  }
}
