/*!
Registry - per-name handler storage.

Each name owns two ordered sequences: persistent handlers and one-shot
handlers. Insertion order is invocation order. A name whose sequences are
both empty is pruned, so it is indistinguishable from a name never seen.

Everything handed out is a copy (`Handler` clones are `Arc` bumps), which is
what makes re-entrant dispatch safe: callers never iterate live storage.
Once-handlers being dispatched stay in place, claimed by their emission, and
are removed when that emission settles.
*/

use std::collections::HashMap;
use std::fmt;

use crate::types::{EventName, Handler};

/// Which sequence a registration goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerKind {
  Persistent,
  Once,
}

impl fmt::Display for ListenerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Persistent => f.write_str("persistent"),
      Self::Once => f.write_str("once"),
    }
  }
}

/// A once-handler plus the bookkeeping that keeps it visible while it is
/// being dispatched.
#[derive(Debug, Clone)]
struct OnceSlot {
  /// Registry tick at registration.
  seq: u64,
  handler: Handler,
  /// Emission currently dispatching this handler.
  claim: Option<u64>,
}

/// Handlers registered under one name.
#[derive(Debug, Default)]
struct Entry {
  persistent: Vec<Handler>,
  once: Vec<OnceSlot>,
}

impl Entry {
  fn len(&self) -> usize {
    self.persistent.len() + self.once.len()
  }

  fn is_empty(&self) -> bool {
    self.persistent.is_empty() && self.once.is_empty()
  }
}

/// Handlers captured at the start of one emission.
///
/// The once-handlers stay registered but are claimed by `emission`, so a
/// nested emission of the same name skips them.
#[derive(Debug)]
pub(crate) struct DispatchSnapshot {
  pub(crate) emission: u64,
  pub(crate) persistent: Vec<Handler>,
  pub(crate) once: Vec<Handler>,
}

impl DispatchSnapshot {
  pub(crate) fn is_empty(&self) -> bool {
    self.persistent.is_empty() && self.once.is_empty()
  }
}

/// Listener storage for one emitter.
#[derive(Debug, Default)]
pub(crate) struct Registry {
  entries: HashMap<EventName, Entry>,
  /// Names in first-registration order.
  order: Vec<EventName>,
  /// Bumped by every registration and every emission start.
  tick: u64,
}

impl Registry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Append `handler` to the tail of the `kind` sequence for `name`.
  /// Returns the new total count for `name`.
  pub(crate) fn register(&mut self, name: EventName, handler: Handler, kind: ListenerKind) -> usize {
    let seq = self.next_tick();
    let entry = self.entry_mut(name);
    match kind {
      ListenerKind::Persistent => entry.persistent.push(handler),
      ListenerKind::Once => entry.once.push(OnceSlot {
        seq,
        handler,
        claim: None,
      }),
    }
    entry.len()
  }

  /// Persistent plus once handlers for `name`, including once-handlers an
  /// emission is still dispatching. 0 for unknown names.
  pub(crate) fn count_for(&self, name: &str) -> usize {
    self.entries.get(name).map_or(0, Entry::len)
  }

  /// Copy of `persistent ++ once` for `name`.
  pub(crate) fn snapshot_for(&self, name: &str) -> Vec<Handler> {
    self
      .entries
      .get(name)
      .map(|entry| {
        let once = entry.once.iter().map(|slot| &slot.handler);
        entry.persistent.iter().chain(once).cloned().collect()
      })
      .unwrap_or_default()
  }

  /// Capture the handlers one emission of `name` should invoke.
  ///
  /// Persistent handlers are copied. Unclaimed once-handlers are claimed for
  /// the new emission and copied; they stay registered until the emission
  /// settles. `None` when the name has no handlers at all.
  pub(crate) fn claim_dispatch(&mut self, name: &str) -> Option<DispatchSnapshot> {
    if self.count_for(name) == 0 {
      return None;
    }
    let emission = self.next_tick();
    let entry = self.entries.get_mut(name)?;
    let once = entry
      .once
      .iter_mut()
      .filter(|slot| slot.claim.is_none())
      .map(|slot| {
        slot.claim = Some(emission);
        slot.handler.clone()
      })
      .collect();
    Some(DispatchSnapshot {
      emission,
      persistent: entry.persistent.clone(),
      once,
    })
  }

  /// Settle a successful emission: drop the once-handlers it fired and the
  /// unclaimed once-handlers registered while it ran.
  pub(crate) fn clear_once(&mut self, name: &str, emission: u64) {
    let Some(entry) = self.entries.get_mut(name) else {
      return;
    };
    let mut late = 0_usize;
    entry.once.retain(|slot| match slot.claim {
      Some(claim) => claim != emission,
      None if slot.seq > emission => {
        late += 1;
        false
      }
      None => true,
    });
    if late > 0 {
      log::debug!("dropping {late} once listener(s) added to '{name}' during emit");
    }
    self.prune(name);
  }

  /// Settle a failed emission. The first `fired` once-handlers it claimed
  /// ran and are dropped; the rest are released in place.
  pub(crate) fn release_once(&mut self, name: &str, emission: u64, fired: usize) {
    if let Some(entry) = self.entries.get_mut(name) {
      let mut remaining = fired;
      entry.once.retain_mut(|slot| {
        if slot.claim != Some(emission) {
          return true;
        }
        if remaining > 0 {
          remaining -= 1;
          return false;
        }
        slot.claim = None;
        true
      });
    }
    self.prune(name);
  }

  /// Names that currently have at least one handler.
  pub(crate) fn event_names(&self) -> Vec<EventName> {
    self
      .order
      .iter()
      .filter(|name| self.count_for(name.as_str()) > 0)
      .cloned()
      .collect()
  }

  fn next_tick(&mut self) -> u64 {
    self.tick += 1;
    self.tick
  }

  fn entry_mut(&mut self, name: EventName) -> &mut Entry {
    if !self.entries.contains_key(name.as_str()) {
      self.order.push(name.clone());
    }
    self.entries.entry(name).or_default()
  }

  fn prune(&mut self, name: &str) {
    if self.entries.get(name).is_some_and(Entry::is_empty) {
      self.entries.remove(name);
      self.order.retain(|n| n.as_str() != name);
    }
  }
}
