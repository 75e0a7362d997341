//! Recovery boundaries: run a unit of work and turn a panic inside it into a
//! [`CapturedError`].
//!
//! A boundary only covers the stack that entered it. Install one per worker
//! thread (see [`spawn`]) or per request (see [`crate::web::recovery`]).

mod error;
mod retry;
mod trace;

pub use error::{BoxError, CapturedError, PanicPayload};
pub use retry::{retry, try_run};
pub use trace::TraceSnapshot;
pub(crate) use trace::BoundaryScope;

use std::io;
use std::thread::{self, JoinHandle};

/// Writes the error and the panic-site stack to the log. Falls back to the
/// current stack when no snapshot was recorded.
pub(crate) fn log_captured(err: &CapturedError) {
    log::error!("Recovered from panic: {}", err.message());
    match err.trace() {
        Some(trace) => log::error!("Stacktrace: {}", trace),
        None => log::error!("Stacktrace: {}", TraceSnapshot::capture()),
    }
}

/// Runs `work`, logging and swallowing any panic.
///
/// Returns `None` if `work` panicked.
pub fn recover<F, R>(work: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    match try_run(work) {
        Ok(value) => Some(value),
        Err(err) => {
            log_captured(&err);
            None
        }
    }
}

/// Runs `work` and passes a panic, if any, to `handler` instead of logging it.
///
/// `handler` runs outside the boundary, so a panic inside it propagates.
pub fn recover_and_handle<F, R, H>(work: F, handler: H) -> Option<R>
where
    F: FnOnce() -> R,
    H: FnOnce(CapturedError),
{
    match try_run(work) {
        Ok(value) => Some(value),
        Err(err) => {
            handler(err);
            None
        }
    }
}

/// Spawns a named thread whose body runs inside [`recover`].
pub fn spawn<F, R>(name: impl Into<String>, work: F) -> io::Result<JoinHandle<Option<R>>>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    thread::Builder::new()
        .name(name.into())
        .spawn(move || recover(work))
}
