/*!
Emission.

Handlers are captured when `emit()` starts and the lock is released before
any of them runs:

1. Persistent handlers are copied, pending once-handlers are claimed.
2. Persistent handlers run in registration order, then once-handlers.
3. On success the claimed once-handlers are dropped, together with any
   once-handler registered while this emission ran.

Claimed once-handlers stay registered, so handlers see them in
`listener_count()` and `listeners()`, but a nested `emit()` of the same name
skips them and each fires exactly once. Handlers registered during the
emission never run in it. The first handler error aborts the emission;
once-handlers that did not run yet are released for the next one.
*/

use super::EventEmitter;
use crate::types::{Arg, EmitterError, EmitterResult, Handler, HandlerError};

impl EventEmitter {
  /// Invoke every handler registered for `name` with `args`.
  ///
  /// Returns `Ok(false)` without side effects when `name` has no handlers,
  /// or only once-handlers an outer emission is still dispatching, `Ok(true)`
  /// otherwise. A handler error is returned as
  /// [`EmitterError::Handler`] and stops the remaining invocations.
  ///
  /// ```
  /// use emitter::{EventEmitter, Handler};
  /// use std::sync::{Arc, Mutex};
  ///
  /// let emitter = EventEmitter::new();
  /// let order = Arc::new(Mutex::new(Vec::new()));
  /// for tag in ["A", "B"] {
  ///   let order = Arc::clone(&order);
  ///   emitter.on("e", Handler::from_fn(move |_| order.lock().unwrap().push(tag)))?;
  /// }
  /// let once = Arc::clone(&order);
  /// emitter.once("e", Handler::from_fn(move |_| once.lock().unwrap().push("C")))?;
  ///
  /// emitter.emit("e", &[])?;
  /// emitter.emit("e", &[])?;
  /// assert_eq!(*order.lock().unwrap(), ["A", "B", "C", "A", "B"]);
  /// # Ok::<(), emitter::EmitterError>(())
  /// ```
  pub fn emit(&self, name: impl AsRef<str>, args: &[Arg]) -> EmitterResult<bool> {
    let name = name.as_ref();
    let Some(snapshot) = self.write(|r| r.claim_dispatch(name)) else {
      return Ok(false);
    };
    if snapshot.is_empty() {
      log::trace!("emit '{name}': every handler is already being dispatched");
      return Ok(false);
    }

    log::trace!(
      "emit '{name}': {} persistent, {} once, {} arg(s)",
      snapshot.persistent.len(),
      snapshot.once.len(),
      args.len()
    );

    let emission = snapshot.emission;
    if let Err((source, _)) = invoke_all(&snapshot.persistent, args) {
      self.write(|r| r.release_once(name, emission, 0));
      return Err(EmitterError::handler(name, source));
    }
    if let Err((source, fired)) = invoke_all(&snapshot.once, args) {
      self.write(|r| r.release_once(name, emission, fired));
      return Err(EmitterError::handler(name, source));
    }

    self.write(|r| r.clear_once(name, emission));
    Ok(true)
  }
}

/// Call each handler in order. On failure, returns the error together with
/// the number of handlers invoked, the failing one included.
fn invoke_all(handlers: &[Handler], args: &[Arg]) -> Result<(), (HandlerError, usize)> {
  for (index, handler) in handlers.iter().enumerate() {
    handler.call(args).map_err(|err| (err, index + 1))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use crate::{Arg, EmitterError, EventEmitter, Handler, HandlerResult, MaxListenersWarning};
  use parking_lot::Mutex;
  use std::sync::Arc;

  type Log = Arc<Mutex<Vec<String>>>;

  fn make_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
  }

  /// Handler that appends `tag` (and its first string argument, if any) to `log`.
  fn record(log: &Log, tag: &'static str) -> Handler {
    let log = Arc::clone(log);
    Handler::from_fn(move |args| {
      let entry = match args.first().and_then(Arg::as_str) {
        Some(arg) => format!("{tag}:{arg}"),
        None => tag.to_string(),
      };
      log.lock().push(entry);
    })
  }

  fn failing(log: &Log, tag: &'static str) -> Handler {
    let log = Arc::clone(log);
    Handler::new(move |_| -> HandlerResult {
      log.lock().push(tag.to_string());
      Err(format!("{tag} failed").into())
    })
  }

  // ==========================================================================
  // Basic dispatch
  // ==========================================================================

  #[test]
  fn emit_without_handlers_returns_false() {
    let emitter = EventEmitter::new();
    assert!(!emitter.emit("nothing", &[Arg::from(1_i64)]).unwrap());
    assert!(emitter.event_names().is_empty());
  }

  #[test]
  fn persistent_then_once_in_registration_order() {
    let emitter = EventEmitter::new();
    let log = make_log();
    emitter.once("e", record(&log, "C")).unwrap();
    emitter.on("e", record(&log, "A")).unwrap();
    emitter.on("e", record(&log, "B")).unwrap();

    assert!(emitter.emit("e", &[]).unwrap());

    assert_eq!(*log.lock(), ["A", "B", "C"]);
  }

  #[test]
  fn args_are_passed_to_every_handler() {
    let emitter = EventEmitter::new();
    let log = make_log();
    emitter.on("e", record(&log, "A")).unwrap();
    emitter.once("e", record(&log, "B")).unwrap();

    emitter.emit("e", &[Arg::from("x"), Arg::from(2_i64)]).unwrap();

    assert_eq!(*log.lock(), ["A:x", "B:x"]);
  }

  #[test]
  fn other_names_are_not_invoked() {
    let emitter = EventEmitter::new();
    let log = make_log();
    emitter.on("a", record(&log, "a")).unwrap();
    emitter.on("b", record(&log, "b")).unwrap();

    emitter.emit("b", &[]).unwrap();

    assert_eq!(*log.lock(), ["b"]);
  }

  #[test]
  fn duplicate_handler_runs_twice() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let h = record(&log, "A");
    emitter.on("e", h.clone()).unwrap();
    emitter.on("e", h).unwrap();

    emitter.emit("e", &[]).unwrap();

    assert_eq!(*log.lock(), ["A", "A"]);
  }

  // ==========================================================================
  // Once handlers
  // ==========================================================================

  #[test]
  fn once_fires_exactly_once() {
    let emitter = EventEmitter::new();
    let log = make_log();
    emitter.once("e", record(&log, "C")).unwrap();

    assert!(emitter.emit("e", &[]).unwrap());
    assert_eq!(emitter.listener_count("e"), 0);
    assert!(!emitter.emit("e", &[]).unwrap(), "nothing left to invoke");

    assert_eq!(*log.lock(), ["C"]);
  }

  #[test]
  fn listeners_before_and_after_emission() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let (a, b, c) = (record(&log, "A"), record(&log, "B"), record(&log, "C"));
    emitter.on("e", a.clone()).unwrap();
    emitter.on("e", b.clone()).unwrap();
    emitter.once("e", c.clone()).unwrap();

    assert_eq!(emitter.listeners("e"), vec![a.clone(), b.clone(), c]);
    emitter.emit("e", &[]).unwrap();
    assert_eq!(emitter.listeners("e"), vec![a, b]);
  }

  #[test]
  fn once_reemitting_its_own_event_fires_once() {
    let emitter = EventEmitter::new();
    let calls = Arc::new(Mutex::new(0_usize));
    let inner = emitter.clone();
    let counter = Arc::clone(&calls);

    emitter
      .once(
        "e",
        Handler::new(move |_| {
          *counter.lock() += 1;
          let nested = inner.emit("e", &[])?;
          assert!(!nested, "the once handler is already in flight");
          Ok(())
        }),
      )
      .unwrap();

    assert!(emitter.emit("e", &[]).unwrap());
    assert_eq!(*calls.lock(), 1);
  }

  #[test]
  fn once_added_during_emission_neither_fires_nor_survives() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();
    let late = record(&log, "late");

    emitter.once("e", record(&log, "C")).unwrap();
    emitter
      .on(
        "e",
        Handler::new(move |_| {
          inner.once("e", late.clone())?;
          Ok(())
        }),
      )
      .unwrap();

    emitter.emit("e", &[]).unwrap();

    assert_eq!(*log.lock(), ["C"]);
    assert_eq!(emitter.listener_count("e"), 1, "only the persistent handler remains");
  }

  #[test]
  fn once_added_during_emission_is_dropped_without_earlier_once() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();
    let late = record(&log, "late");
    let added = Arc::new(Mutex::new(false));
    let added_flag = Arc::clone(&added);

    emitter
      .on(
        "e",
        Handler::new(move |_| {
          let mut added = added_flag.lock();
          if !*added {
            *added = true;
            inner.once("e", late.clone())?;
          }
          Ok(())
        }),
      )
      .unwrap();

    emitter.emit("e", &[]).unwrap();
    assert_eq!(emitter.listener_count("e"), 1);

    emitter.emit("e", &[]).unwrap();
    assert!(log.lock().is_empty());
  }

  #[test]
  fn once_added_after_once_bucket_drained_is_dropped() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();
    let late = record(&log, "late");
    let emissions = Arc::new(Mutex::new(0_usize));
    let seen = Arc::clone(&emissions);

    emitter.once("e", record(&log, "X")).unwrap();
    emitter
      .on(
        "e",
        Handler::new(move |_| {
          let mut seen = seen.lock();
          *seen += 1;
          if *seen > 1 {
            inner.once("e", late.clone())?;
          }
          Ok(())
        }),
      )
      .unwrap();

    emitter.emit("e", &[]).unwrap();
    emitter.emit("e", &[]).unwrap();

    assert_eq!(*log.lock(), ["X"]);
    assert_eq!(emitter.listener_count("e"), 1, "only the persistent handler remains");
  }

  // ==========================================================================
  // Re-entrancy
  // ==========================================================================

  #[test]
  fn handler_added_during_emission_runs_next_time() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();
    let d = record(&log, "D");
    let added = Arc::new(Mutex::new(false));
    let added_flag = Arc::clone(&added);

    emitter.on("e", record(&log, "A")).unwrap();
    emitter
      .on(
        "e",
        Handler::new(move |_| {
          let mut added = added_flag.lock();
          if !*added {
            *added = true;
            inner.on("e", d.clone())?;
          }
          Ok(())
        }),
      )
      .unwrap();

    emitter.emit("e", &[]).unwrap();
    assert_eq!(*log.lock(), ["A"], "D was not in the snapshot");

    emitter.emit("e", &[]).unwrap();
    assert_eq!(*log.lock(), ["A", "A", "D"]);
  }

  #[test]
  fn pending_once_handlers_are_visible_while_dispatching() {
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&warnings);
    let emitter = EventEmitter::builder()
      .max_listeners(2_usize)
      .diagnostics(move |w: &MaxListenersWarning| sink.lock().push(w.count))
      .build();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_handler = Arc::clone(&seen);
    let inner = emitter.clone();
    let c = Handler::from_fn(|_| {});

    emitter
      .on(
        "e",
        Handler::new(move |_| {
          seen_in_handler
            .lock()
            .push((inner.listener_count("e"), inner.listeners("e").len()));
          inner.on("e", Handler::from_fn(|_| {}))?;
          Ok(())
        }),
      )
      .unwrap();
    emitter.once("e", c.clone()).unwrap();

    emitter.emit("e", &[]).unwrap();

    assert_eq!(*seen.lock(), [(2, 2)]);
    assert_eq!(*warnings.lock(), [3]);
    assert!(!emitter.listeners("e").contains(&c));
    assert_eq!(emitter.listener_count("e"), 2);
  }

  #[test]
  fn nested_emit_of_other_event() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();

    emitter.on("inner", record(&log, "inner")).unwrap();
    emitter
      .on(
        "outer",
        Handler::new(move |args| {
          inner.emit("inner", args)?;
          Ok(())
        }),
      )
      .unwrap();
    emitter.on("outer", record(&log, "outer")).unwrap();

    emitter.emit("outer", &[Arg::from("v")]).unwrap();

    assert_eq!(*log.lock(), ["inner:v", "outer:v"]);
  }

  // ==========================================================================
  // Failures
  // ==========================================================================

  #[test]
  fn failure_aborts_remaining_handlers() {
    let emitter = EventEmitter::new();
    let log = make_log();
    emitter.on("e", record(&log, "A")).unwrap();
    emitter.on("e", failing(&log, "B")).unwrap();
    emitter.on("e", record(&log, "C")).unwrap();

    let err = emitter.emit("e", &[]).unwrap_err();

    assert!(matches!(&err, EmitterError::Handler { event, .. } if *event == "e"));
    assert_eq!(err.to_string(), "Handler for 'e' failed: B failed");
    assert_eq!(*log.lock(), ["A", "B"]);
  }

  #[test]
  fn persistent_failure_keeps_once_handlers_registered() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let c = record(&log, "C");
    emitter.on("e", failing(&log, "A")).unwrap();
    emitter.once("e", c.clone()).unwrap();

    assert!(emitter.emit("e", &[]).is_err());

    assert_eq!(emitter.listener_count("e"), 2);
    assert_eq!(emitter.listeners("e").last(), Some(&c));
  }

  #[test]
  fn once_failure_restores_only_unreached_handlers() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let (c1, c3) = (record(&log, "C1"), record(&log, "C3"));
    let c2 = failing(&log, "C2");
    emitter.once("e", c1).unwrap();
    emitter.once("e", c2).unwrap();
    emitter.once("e", c3.clone()).unwrap();

    assert!(emitter.emit("e", &[]).is_err());
    assert_eq!(emitter.listeners("e"), vec![c3]);

    emitter.emit("e", &[]).unwrap();
    assert_eq!(*log.lock(), ["C1", "C2", "C3"]);
    assert_eq!(emitter.listener_count("e"), 0);
  }

  #[test]
  fn nested_failure_reports_both_events() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let inner = emitter.clone();
    emitter.on("inner", failing(&log, "I")).unwrap();
    emitter
      .on(
        "outer",
        Handler::new(move |_| {
          inner.emit("inner", &[])?;
          Ok(())
        }),
      )
      .unwrap();

    let err = emitter.emit("outer", &[]).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Handler for 'outer' failed: Handler for 'inner' failed: I failed"
    );
  }
}
