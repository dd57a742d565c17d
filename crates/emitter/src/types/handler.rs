/*!
Handlers - the callables registered against an event name.

`Listener` is the capability a handler must provide: "callable with N
arguments". Closures get it for free; stateful types can implement it
directly. `Handler` is the shared, cheap-to-clone value the registry stores.
*/

use super::Arg;
use std::fmt;
use std::sync::Arc;

/// Error a handler may return. Propagated to the caller of `emit`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by a handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Something that can be invoked with the arguments of an emission.
pub trait Listener: Send + Sync {
  /// Invoke with the emitted arguments.
  fn call(&self, args: &[Arg]) -> HandlerResult;
}

impl<F> Listener for F
where
  F: Fn(&[Arg]) -> HandlerResult + Send + Sync,
{
  fn call(&self, args: &[Arg]) -> HandlerResult {
    self(args)
  }
}

/// A registered callback.
///
/// Equality is identity: two handlers are equal iff they share the same
/// underlying listener. Registering the same handler twice is allowed and
/// results in two invocations per emission.
#[derive(Clone)]
pub struct Handler(Arc<dyn Listener>);

impl Handler {
  /// Wrap a fallible closure.
  ///
  /// ```
  /// use emitter::{Arg, Handler};
  ///
  /// let handler = Handler::new(|args: &[Arg]| {
  ///   assert_eq!(args.len(), 1);
  ///   Ok(())
  /// });
  /// assert!(handler.call(&[Arg::from(1_i64)]).is_ok());
  /// ```
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&[Arg]) -> HandlerResult + Send + Sync + 'static,
  {
    Self(Arc::new(f))
  }

  /// Wrap a closure that cannot fail.
  pub fn from_fn<F>(f: F) -> Self
  where
    F: Fn(&[Arg]) + Send + Sync + 'static,
  {
    Self::new(move |args: &[Arg]| {
      f(args);
      Ok(())
    })
  }

  /// Wrap any [`Listener`] implementation.
  pub fn from_listener(listener: impl Listener + 'static) -> Self {
    Self(Arc::new(listener))
  }

  /// Invoke the handler.
  pub fn call(&self, args: &[Arg]) -> HandlerResult {
    self.0.call(args)
  }

  /// Whether both values refer to the same listener.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl PartialEq for Handler {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other)
  }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Handler")
      .field(&Arc::as_ptr(&self.0).cast::<()>())
      .finish()
  }
}
