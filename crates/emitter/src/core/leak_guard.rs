/*!
Leak guard - warns when one event name accumulates too many handlers.

Warns at most once per emitter, across all event names. A second name
crossing the ceiling on an emitter that already warned stays silent.
*/

use super::EventEmitter;
use crate::types::{EventName, MaxListeners, MaxListenersWarning};

/// Ceiling and warned flag for one emitter.
#[derive(Debug)]
pub(crate) struct LeakGuard {
  max_listeners: MaxListeners,
  warned: bool,
}

impl LeakGuard {
  pub(crate) const fn new(max_listeners: MaxListeners) -> Self {
    Self {
      max_listeners,
      warned: false,
    }
  }

  pub(crate) const fn max_listeners(&self) -> MaxListeners {
    self.max_listeners
  }

  /// Does not reset `warned`.
  pub(crate) fn set_max_listeners(&mut self, max: MaxListeners) {
    self.max_listeners = max;
  }

  pub(crate) const fn warned(&self) -> bool {
    self.warned
  }

  /// Build the warning if `count` breaches the ceiling and this emitter has
  /// not warned yet. Marks the emitter as warned when it does.
  pub(crate) fn check(&mut self, event: &EventName, count: usize) -> Option<MaxListenersWarning> {
    if self.warned || !self.max_listeners.is_exceeded_by(count) {
      return None;
    }
    self.warned = true;
    Some(MaxListenersWarning::new(event.clone(), count, self.max_listeners))
  }
}

impl EventEmitter {
  /// Run after every successful registration on `name`, with the count the
  /// registration produced.
  pub(super) fn check_listener_count(&self, name: &EventName, count: usize) {
    let warning = self.guard.lock().check(name, count);

    // Sink runs with no lock held; it may call back into the emitter.
    if let Some(warning) = warning {
      self.sink.warn(&warning);
    }
  }
}
