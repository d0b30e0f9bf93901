//! NAND Core
//!
//! This crate models combinational circuits built entirely from NAND gates.
//! It implements:
//!
//! - A gate graph with bidirectional wiring kept consistent under mutation
//! - Evaluation of output signals and critical path lengths
//! - Cycle and missing-input detection during evaluation
//!
//! Only acyclic wiring is a valid combinational circuit. Cycles may be wired
//! but make evaluation fail.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: gates, signals, and the circuit arena that wires them
//! - `eval`: per-gate evaluation, batch entry point, and state cleanup
//! - `config`: circuit tunables
//! - `error`: error types
//! - `shared`: a mutex-guarded circuit for multi-threaded callers
//!
//! With the `python` feature the crate also builds as a Python extension
//! module.
//!
//! # Example
//!
//! ```rust
//! use nand_core::graph::{Circuit, Signal};
//!
//! let high = Signal::new(true);
//! let mut circuit = Circuit::new();
//!
//! // g1 = NAND(true, true) = false
//! let g1 = circuit.create_gate(2)?;
//! circuit.connect_signal(&high, g1, 0)?;
//! circuit.connect_signal(&high, g1, 1)?;
//!
//! // g2 = NOT(g1) = true
//! let g2 = circuit.create_gate(1)?;
//! circuit.connect_gate(g1, g2, 0)?;
//!
//! let mut results = [false];
//! let critical_path = circuit.evaluate(&[g2], &mut results)?;
//! assert_eq!(results, [true]);
//! assert_eq!(critical_path, 2);
//! # Ok::<(), nand_core::CircuitError>(())
//! ```

pub mod config;
pub mod error;
mod eval;
pub mod graph;
pub mod shared;

#[cfg(feature = "python")]
mod python;

pub use config::CircuitConfig;
pub use error::{CircuitError, ErrorKind, EvalFailure, Result};
pub use graph::{Circuit, GateId, Input, Signal};
pub use shared::SharedCircuit;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PySignal>()?;
    m.add_class::<python::PyCircuit>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
