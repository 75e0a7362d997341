//! Fail-fast precondition checks.
//!
//! Each helper panics with `(<file>:<line>): <message> <detail>` where the
//! location is the helper's caller. Nothing happens when the check passes.

use std::fmt::Display;
use std::panic::Location;

#[track_caller]
#[cold]
fn fail(message: &str, detail: impl Display) -> ! {
    let caller = Location::caller();
    panic!("({}:{}): {} {}", caller.file(), caller.line(), message, detail)
}

/// Panics if `result` is an error, returns the value otherwise.
#[track_caller]
pub fn on_error<T, E: Display>(result: Result<T, E>, message: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(message, err),
    }
}

/// Panics if `value` is absent, returns the value otherwise.
#[track_caller]
pub fn on_nil<T>(value: Option<T>, message: &str) -> T {
    match value {
        Some(value) => value,
        None => fail(message, "nil value"),
    }
}

#[track_caller]
pub fn on_false(condition: bool, message: &str) {
    if !condition {
        fail(message, "condition is false")
    }
}

/// Panics if `value` is empty or only whitespace.
#[track_caller]
pub fn on_blank(value: &str, message: &str) {
    if value.trim().is_empty() {
        fail(message, "blank string.")
    }
}
