/*! Core types for the emitter. */

#![allow(missing_docs)]

mod arg;
mod error;
mod handler;
mod limit;
mod name;
mod warning;

pub use arg::Arg;
pub use error::{EmitterError, EmitterResult};
pub use handler::{Handler, HandlerError, HandlerResult, Listener};
pub use limit::{default_max_listeners, set_default_max_listeners, MaxListeners, DEFAULT_MAX_LISTENERS};
pub use name::{EventName, NEW_LISTENER};
pub use warning::{MaxListenersWarning, MAX_LISTENERS_EXCEEDED};

#[cfg(test)]
pub(crate) use limit::process_default_lock;
