//! Stack snapshots taken where a panic starts, before the stack unwinds.
//!
//! A chained panic hook records a [`TraceSnapshot`] for panics raised while a
//! recovery boundary is active on the current thread. The boundary then
//! takes it out of the thread-local slot and attaches it to the
//! [`super::CapturedError`].

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic;
use std::sync::Once;
use std::thread;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static BOUNDARY_DEPTH: Cell<usize> = const { Cell::new(0) };
    static PANIC_TRACE: RefCell<Option<TraceSnapshot>> = const { RefCell::new(None) };
}

/// Call stack captured for diagnostics. Only ever rendered, never stored.
pub struct TraceSnapshot(Backtrace);

impl TraceSnapshot {
    /// Captures the current stack regardless of `RUST_BACKTRACE`.
    #[inline(never)]
    pub fn capture() -> Self {
        TraceSnapshot(Backtrace::force_capture())
    }
}

impl fmt::Display for TraceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TraceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn install_hook() {
    // set_hook panics when called from a panicking thread
    if thread::panicking() {
        return;
    }
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let inside_boundary = BOUNDARY_DEPTH
                .try_with(|depth| depth.get() > 0)
                .unwrap_or(false);
            if inside_boundary {
                let _ = PANIC_TRACE
                    .try_with(|slot| *slot.borrow_mut() = Some(TraceSnapshot::capture()));
            }
            previous(info);
        }));
    });
}

/// Marks the current thread as running inside a recovery boundary until
/// dropped.
pub(crate) struct BoundaryScope(());

impl BoundaryScope {
    pub(crate) fn enter() -> Self {
        install_hook();
        BOUNDARY_DEPTH.with(|depth| {
            if depth.get() == 0 {
                PANIC_TRACE.with(|slot| slot.borrow_mut().take());
            }
            depth.set(depth.get() + 1);
        });
        BoundaryScope(())
    }
}

impl Drop for BoundaryScope {
    fn drop(&mut self) {
        let _ = BOUNDARY_DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Takes the snapshot recorded by the hook for the last panic on this
/// thread, if any.
pub(crate) fn take_panic_trace() -> Option<TraceSnapshot> {
    PANIC_TRACE
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}
