//! Panic-based assertion helpers and the boundaries that turn panics back
//! into errors: [`recover`], [`try_run`], [`retry`], and an HTTP layer
//! answering `500 Internal Server Error` for a panicking request.
//!
//! Boundaries rely on unwinding; building with `panic = "abort"` turns every
//! helper into a process abort.

pub mod abort;
pub mod assert;
pub mod recover;
pub mod web;

#[cfg(test)]
mod test_log;

pub use abort::{raise, with_trace, TracedPanic};
pub use assert::{on_blank, on_error, on_false, on_nil};
pub use recover::{
    recover, recover_and_handle, retry, spawn, try_run, CapturedError, PanicPayload,
    TraceSnapshot,
};
