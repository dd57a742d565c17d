/*! Event names. */

use derive_more::{Display, From};
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::sync::Arc;

/// Name of the event fired on every `on`/`once` call, before the new handler
/// is appended. Arguments are `[Arg::Name(name), Arg::Handler(handler)]`.
pub const NEW_LISTENER: &str = "newListener";

/// Identifies a class of events. Handlers subscribe per name.
///
/// Cheap to clone (`Arc` bump). Two names are the same event iff they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct EventName(Arc<str>);

impl EventName {
  /// Create a name from anything string-like.
  pub fn new(name: impl AsRef<str>) -> Self {
    Self(Arc::from(name.as_ref()))
  }

  /// The name as a string slice.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Empty names are rejected at registration.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<&str> for EventName {
  fn from(name: &str) -> Self {
    Self(Arc::from(name))
  }
}

impl From<String> for EventName {
  fn from(name: String) -> Self {
    Self(Arc::from(name))
  }
}

impl From<&EventName> for EventName {
  fn from(name: &EventName) -> Self {
    name.clone()
  }
}

impl AsRef<str> for EventName {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// Lets the registry map be queried with `&str` without allocating.
impl Borrow<str> for EventName {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl PartialEq<str> for EventName {
  fn eq(&self, other: &str) -> bool {
    &*self.0 == other
  }
}

impl PartialEq<&str> for EventName {
  fn eq(&self, other: &&str) -> bool {
    &*self.0 == *other
  }
}

impl Serialize for EventName {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}
