//! Shared Circuits
//!
//! [`Circuit`] has no internal locking. When a circuit has to be reached from
//! several threads, wrap it in a [`SharedCircuit`]: every access goes through
//! one mutex, so a rewiring can never interleave with an evaluation.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::graph::{Circuit, GateId};

/// A circuit behind a mutex, cheap to clone and share between threads.
#[derive(Clone, Default)]
pub struct SharedCircuit {
    inner: Arc<Mutex<Circuit>>,
}

impl SharedCircuit {
    /// Wrap an existing circuit.
    pub fn new(circuit: Circuit) -> Self {
        Self {
            inner: Arc::new(Mutex::new(circuit)),
        }
    }

    /// Lock the circuit for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Circuit> {
        self.inner.lock()
    }

    /// Evaluate `gates` under the lock, returning the critical path and the
    /// output of each gate.
    pub fn evaluate(&self, gates: &[GateId]) -> Result<(usize, Vec<bool>)> {
        let mut results = vec![false; gates.len()];
        let path = self.lock().evaluate(gates, &mut results)?;
        Ok((path, results))
    }

    /// Run `f` with exclusive access to the circuit.
    pub fn with<R>(&self, f: impl FnOnce(&mut Circuit) -> R) -> R {
        f(&mut *self.lock())
    }
}

impl std::fmt::Debug for SharedCircuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(circuit) => f
                .debug_struct("SharedCircuit")
                .field("gate_count", &circuit.gate_count())
                .finish(),
            None => f.debug_struct("SharedCircuit").finish_non_exhaustive(),
        }
    }
}
