/*! Leak warning payload. */

use super::{EventName, MaxListeners};
use serde::Serialize;
use std::fmt;

/// Kind tag carried by every [`MaxListenersWarning`].
pub const MAX_LISTENERS_EXCEEDED: &str = "MaxListenersExceededWarning";

/// Diagnostic produced when one event name accumulates more handlers than
/// the emitter's ceiling. Not an error: registration still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaxListenersWarning {
  /// Human-readable description including the count and event name.
  pub message: String,
  /// Always [`MAX_LISTENERS_EXCEEDED`].
  #[serde(rename = "type")]
  pub kind: &'static str,
  /// The event name that crossed the ceiling.
  pub event: EventName,
  /// Handler count on `event` at the time of the warning.
  pub count: usize,
  /// Ceiling in force when the warning fired.
  pub limit: MaxListeners,
}

impl MaxListenersWarning {
  pub(crate) fn new(event: EventName, count: usize, limit: MaxListeners) -> Self {
    Self {
      message: format!(
        "Possible EventEmitter memory leak detected. {count} {event} listeners added \
         (limit {limit}). Use set_max_listeners() to increase limit"
      ),
      kind: MAX_LISTENERS_EXCEEDED,
      event,
      count,
      limit,
    }
  }
}

impl fmt::Display for MaxListenersWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.kind, self.message)
  }
}
