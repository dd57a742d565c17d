/*!
Diagnostic sinks.

The leak guard only builds a [`MaxListenersWarning`]; delivering it is the
sink's job. The default sink forwards to the `log` facade.
*/

use crate::types::MaxListenersWarning;

/// Receives leak warnings. Called synchronously, with no emitter lock held.
pub trait DiagnosticSink: Send + Sync {
  /// Deliver one warning.
  fn warn(&self, warning: &MaxListenersWarning);
}

/// Forwards warnings to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
  fn warn(&self, warning: &MaxListenersWarning) {
    log::warn!(target: "emitter", "{warning}");
  }
}

impl<F> DiagnosticSink for F
where
  F: Fn(&MaxListenersWarning) + Send + Sync,
{
  fn warn(&self, warning: &MaxListenersWarning) {
    self(warning);
  }
}
