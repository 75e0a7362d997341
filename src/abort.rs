//! Deliberate aborts: unwinding on purpose with a payload that a
//! [`crate::recover`] boundary turns back into the original error.

use std::error::Error as StdError;
use std::panic::panic_any;

use thiserror::Error;

use crate::recover::{BoxError, TraceSnapshot};

/// Payload of [`with_trace`]: the message plus the stack at the raise site.
#[derive(Debug, Error)]
#[error("panic: {message}\nStacktrace: {trace}\n---")]
pub struct TracedPanic {
    pub message: String,
    pub trace: TraceSnapshot,
}

/// Panics with `message` and a stack trace taken here.
pub fn with_trace(message: impl Into<String>) -> ! {
    raise(TracedPanic {
        message: message.into(),
        trace: TraceSnapshot::capture(),
    })
}

/// Panics with `err` as payload. A capture boundary hands the same value
/// back through [`crate::CapturedError::downcast_ref`].
pub fn raise<E>(err: E) -> !
where
    E: StdError + Send + Sync + 'static,
{
    let boxed: BoxError = Box::new(err);
    panic_any(boxed)
}
