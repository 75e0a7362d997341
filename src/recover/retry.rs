use std::panic::{catch_unwind, AssertUnwindSafe};

use super::trace::BoundaryScope;
use super::CapturedError;

/// Runs `work` once, returning the panic as an error instead of unwinding.
///
/// The error carries the stack recorded where the panic started.
pub fn try_run<F, R>(work: F) -> Result<R, CapturedError>
where
    F: FnOnce() -> R,
{
    let scope = BoundaryScope::enter();
    let result = catch_unwind(AssertUnwindSafe(work));
    drop(scope);
    result.map_err(CapturedError::from_unwind)
}

/// Runs `work` until it completes without panicking, at most `max_attempts`
/// times.
///
/// Every failed attempt is logged. When all attempts fail the last error is
/// returned; with `max_attempts == 0` nothing runs and the result is `Ok`.
pub fn retry<F>(max_attempts: usize, mut work: F) -> Result<(), CapturedError>
where
    F: FnMut(),
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match try_run(&mut work) {
            Ok(()) => return Ok(()),
            Err(err) => {
                if attempt < max_attempts {
                    log::error!(
                        "Attempt {}/{} failed, retrying: {}",
                        attempt,
                        max_attempts,
                        err
                    );
                } else {
                    log::error!(
                        "Attempt {}/{} failed, giving up: {}",
                        attempt,
                        max_attempts,
                        err
                    );
                }
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
