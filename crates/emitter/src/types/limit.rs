/*!
Listener ceilings.

Each emitter snapshots the process-wide default when it is built. Changing
the default afterwards only affects emitters built later.
*/

use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

/// Ceiling used when nothing else has been configured.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Maximum number of handlers on one event name before the leak warning fires.
///
/// `Limit(0)` is a valid (very strict) ceiling, not "unlimited".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxListeners {
  /// Warn once the count goes above this value.
  Limit(usize),
  /// Never warn.
  Unlimited,
}

impl MaxListeners {
  /// Whether `count` handlers on one name breach this ceiling.
  ///
  /// ```
  /// use emitter::MaxListeners;
  ///
  /// assert!(!MaxListeners::Limit(1).is_exceeded_by(1));
  /// assert!(MaxListeners::Limit(1).is_exceeded_by(2));
  /// assert!(MaxListeners::Limit(0).is_exceeded_by(1));
  /// assert!(!MaxListeners::Unlimited.is_exceeded_by(usize::MAX));
  /// ```
  pub const fn is_exceeded_by(self, count: usize) -> bool {
    match self {
      Self::Limit(limit) => count > limit,
      Self::Unlimited => false,
    }
  }

  /// The numeric ceiling, `None` when unlimited.
  pub const fn limit(self) -> Option<usize> {
    match self {
      Self::Limit(limit) => Some(limit),
      Self::Unlimited => None,
    }
  }
}

impl Default for MaxListeners {
  fn default() -> Self {
    Self::Limit(DEFAULT_MAX_LISTENERS)
  }
}

impl From<usize> for MaxListeners {
  fn from(limit: usize) -> Self {
    Self::Limit(limit)
  }
}

impl fmt::Display for MaxListeners {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Limit(limit) => write!(f, "{limit}"),
      Self::Unlimited => f.write_str("unlimited"),
    }
  }
}

/// Process-wide default, read by `EmitterBuilder::build`.
static PROCESS_DEFAULT: RwLock<MaxListeners> =
  parking_lot::const_rwlock(MaxListeners::Limit(DEFAULT_MAX_LISTENERS));

/// Current process-wide default ceiling.
pub fn default_max_listeners() -> MaxListeners {
  *PROCESS_DEFAULT.read()
}

/// Replace the process-wide default ceiling. Returns the new value.
///
/// Emitters that already exist keep the ceiling they were built with.
pub fn set_default_max_listeners(max: impl Into<MaxListeners>) -> MaxListeners {
  let max = max.into();
  *PROCESS_DEFAULT.write() = max;
  log::debug!("default max listeners set to {max}");
  max
}

/// Serializes tests that read or write the process-wide default.
#[cfg(test)]
pub(crate) fn process_default_lock() -> parking_lot::MutexGuard<'static, ()> {
  static LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
  LOCK.lock()
}
