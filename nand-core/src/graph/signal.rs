//! Signal Implementation
//!
//! A Signal is a boolean value owned outside the circuit. Gates connect to a
//! signal by reference: the circuit only ever reads it, and the caller may
//! flip it between evaluations to drive the circuit with new inputs.
//!
//! # Thread Safety
//!
//! The value lives behind an `Arc<AtomicBool>`, so clones of a signal can be
//! handed to other threads and updated while the circuit is idle.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// An externally-owned boolean that gate inputs can read from.
///
/// Cloning a signal yields another handle to the same value. Two handles are
/// equal when they refer to the same underlying value.
///
/// # Example
///
/// ```rust
/// use nand_core::graph::Signal;
///
/// let enable = Signal::new(true);
/// let handle = enable.clone();
///
/// handle.set(false);
/// assert!(!enable.get());
/// ```
#[derive(Clone)]
pub struct Signal {
    /// Unique identifier for this signal.
    id: u64,

    /// The shared value.
    value: Arc<AtomicBool>,
}

impl Signal {
    /// Create a new signal with the given initial value.
    pub fn new(value: bool) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(AtomicBool::new(value)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    /// Set a new value.
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Invert the value, returning the new one.
    pub fn toggle(&self) -> bool {
        !self.value.fetch_xor(true, Ordering::AcqRel)
    }

    /// Check whether two handles refer to the same value.
    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Signal {}

impl Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
