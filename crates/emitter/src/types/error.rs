/*! Error types for emitter operations. */

use super::{EventName, HandlerError};

/// Errors that can occur during emitter operations.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Handler for '{event}' failed: {source}")]
  Handler {
    event: EventName,
    #[source]
    source: HandlerError,
  },
}

impl EmitterError {
  pub(crate) fn handler(event: impl Into<EventName>, source: HandlerError) -> Self {
    Self::Handler {
      event: event.into(),
      source,
    }
  }
}

/// Result type for emitter operations.
pub type EmitterResult<T> = Result<T, EmitterError>;
