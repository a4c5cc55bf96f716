//! Process-wide interrupt flag.
//!
//! The Ctrl-C handler sets the flag; every stage checks it at its loop
//! boundaries and stops issuing new tool invocations once it is set.
//! Results flushed before the interrupt stay on disk.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Mark the run as interrupted. Called from the signal handler.
pub fn trigger() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Check whether the run was interrupted.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
