/*!
Emission arguments.

An emission carries an ordered slice of `Arg`s. Most payloads are plain data
(`serde_json::Value`); the `newListener` notification carries an event name
and a handler; anything else can ride along as a shared `Any`.
*/

use super::{EventName, Handler};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One argument passed to handlers.
#[derive(Clone)]
pub enum Arg {
  /// Plain data.
  Value(Value),
  /// An event name (first argument of `newListener`).
  Name(EventName),
  /// A handler (second argument of `newListener`).
  Handler(Handler),
  /// Any other shared value. Compared by identity.
  Any(Arc<dyn Any + Send + Sync>),
}

impl Arg {
  /// Wrap an arbitrary value.
  pub fn any<T: Any + Send + Sync>(value: T) -> Self {
    Self::Any(Arc::new(value))
  }

  /// Get the data value, if this is one.
  pub const fn as_value(&self) -> Option<&Value> {
    match self {
      Self::Value(v) => Some(v),
      Self::Name(_) | Self::Handler(_) | Self::Any(_) => None,
    }
  }

  /// Get a string payload.
  pub fn as_str(&self) -> Option<&str> {
    self.as_value().and_then(Value::as_str)
  }

  /// Get an integer payload.
  pub fn as_i64(&self) -> Option<i64> {
    self.as_value().and_then(Value::as_i64)
  }

  /// Get a boolean payload.
  pub fn as_bool(&self) -> Option<bool> {
    self.as_value().and_then(Value::as_bool)
  }

  /// Get the event name, if this is one.
  pub const fn as_name(&self) -> Option<&EventName> {
    match self {
      Self::Name(name) => Some(name),
      Self::Value(_) | Self::Handler(_) | Self::Any(_) => None,
    }
  }

  /// Get the handler, if this is one.
  pub const fn as_handler(&self) -> Option<&Handler> {
    match self {
      Self::Handler(handler) => Some(handler),
      Self::Value(_) | Self::Name(_) | Self::Any(_) => None,
    }
  }

  /// Downcast an `Any` payload.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    match self {
      Self::Any(value) => value.downcast_ref::<T>(),
      Self::Value(_) | Self::Name(_) | Self::Handler(_) => None,
    }
  }
}

impl PartialEq for Arg {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Value(a), Self::Value(b)) => a == b,
      (Self::Name(a), Self::Name(b)) => a == b,
      (Self::Handler(a), Self::Handler(b)) => a == b,
      (Self::Any(a), Self::Any(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl fmt::Debug for Arg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
      Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
      Self::Handler(handler) => f.debug_tuple("Handler").field(handler).finish(),
      Self::Any(_) => f.write_str("Any(..)"),
    }
  }
}

impl From<Value> for Arg {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

impl From<&str> for Arg {
  fn from(value: &str) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<String> for Arg {
  fn from(value: String) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<bool> for Arg {
  fn from(value: bool) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<i64> for Arg {
  fn from(value: i64) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<u64> for Arg {
  fn from(value: u64) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<f64> for Arg {
  fn from(value: f64) -> Self {
    Self::Value(Value::from(value))
  }
}

impl From<EventName> for Arg {
  fn from(name: EventName) -> Self {
    Self::Name(name)
  }
}

impl From<Handler> for Arg {
  fn from(handler: Handler) -> Self {
    Self::Handler(handler)
  }
}
