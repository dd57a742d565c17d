/*!
Emitter - in-process event listener registry

Named events map to ordered handler lists. `emit` invokes every handler
registered for a name, synchronously, with the emitted arguments.

```
use emitter::{Arg, EventEmitter, Handler, MaxListeners};

let emitter = EventEmitter::builder()
  .max_listeners(MaxListeners::Limit(20))
  .build();

// Persistent handler: runs on every emission
emitter.on("message", Handler::from_fn(|args| {
  println!("got {:?}", args.first().and_then(Arg::as_str));
}))?;

// One-shot handler: runs on the next emission, then disappears
emitter.once("message", Handler::from_fn(|_| println!("first message")))?;
assert_eq!(emitter.listener_count("message"), 2);

emitter.emit("message", &[Arg::from("hello")])?;
assert_eq!(emitter.listener_count("message"), 1);

// Handlers may fail; the error stops the emission and reaches the caller
emitter.on("message", Handler::new(|_| Err("rejected".into())))?;
assert!(emitter.emit("message", &[]).is_err());
# Ok::<(), emitter::EmitterError>(())
```

Handlers may call back into the emitter (register, emit, query) while they
run. Each emission works on the handler list captured when it started.

Registering more handlers on one name than the ceiling allows produces a
single [`MaxListenersWarning`] per emitter, delivered to its
[`DiagnosticSink`] (by default the `log` facade).
*/

mod core;
mod diagnostics;

mod types;
pub use types::*;

pub use crate::core::{EmitterBuilder, EventEmitter};
pub use crate::diagnostics::{DiagnosticSink, LogSink};
