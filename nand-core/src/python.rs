//! Python Bindings
//!
//! Exposes circuits to Python as `Circuit` and `Signal` classes. Gates are
//! handed out as integer handles.
//!
//! ```python
//! from nand_core._core import Circuit, Signal
//!
//! high = Signal(True)
//! c = Circuit()
//! g = c.create_gate(2)
//! c.connect_signal(high, g, 0)
//! c.connect_signal(high, g, 1)
//! path, outputs = c.evaluate([g])   # (1, [False])
//! ```

use pyo3::exceptions::{PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::CircuitConfig;
use crate::error::CircuitError;
use crate::graph::{Circuit, GateId, Input, Signal};

impl From<CircuitError> for PyErr {
    fn from(err: CircuitError) -> Self {
        match err {
            CircuitError::InvalidArgument(_) => PyValueError::new_err(err.to_string()),
            CircuitError::OutOfMemory(_) => PyMemoryError::new_err(err.to_string()),
            CircuitError::OperationCanceled(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Python-exposed Signal type.
#[pyclass(name = "Signal")]
#[derive(Clone)]
pub struct PySignal {
    inner: Signal,
}

#[pymethods]
impl PySignal {
    /// Create a new signal with the given initial value.
    #[new]
    fn new(value: bool) -> Self {
        Self {
            inner: Signal::new(value),
        }
    }

    /// Get the current value.
    #[getter]
    fn value(&self) -> bool {
        self.inner.get()
    }

    /// Set a new value.
    #[setter]
    fn set_value(&self, value: bool) {
        self.inner.set(value);
    }

    /// Get the signal's unique ID.
    #[getter]
    fn id(&self) -> u64 {
        self.inner.id()
    }

    fn __repr__(&self) -> String {
        format!("Signal(id={}, value={})", self.inner.id(), self.inner.get())
    }
}

/// Python-exposed Circuit type.
#[pyclass(name = "Circuit")]
pub struct PyCircuit {
    inner: Circuit,
}

#[pymethods]
impl PyCircuit {
    /// Create a circuit, optionally from a JSON configuration.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let inner = match config_json {
            Some(json) => Circuit::with_config(CircuitConfig::from_json(json)?)?,
            None => Circuit::new(),
        };
        Ok(Self { inner })
    }

    fn create_gate(&mut self, inputs: u32) -> PyResult<u64> {
        Ok(self.inner.create_gate(inputs)?.raw())
    }

    fn destroy_gate(&mut self, gate: u64) {
        self.inner.destroy_gate(GateId::from(gate));
    }

    fn connect_signal(&mut self, signal: PyRef<'_, PySignal>, gate: u64, slot: u32) -> PyResult<()> {
        Ok(self.inner.connect_signal(&signal.inner, GateId::from(gate), slot)?)
    }

    fn connect_gate(&mut self, source: u64, dest: u64, slot: u32) -> PyResult<()> {
        Ok(self
            .inner
            .connect_gate(GateId::from(source), GateId::from(dest), slot)?)
    }

    fn disconnect(&mut self, gate: u64, slot: u32) -> PyResult<()> {
        Ok(self.inner.disconnect(GateId::from(gate), slot)?)
    }

    /// Evaluate the gates, returning `(critical_path, outputs)`.
    fn evaluate(&mut self, gates: Vec<u64>) -> PyResult<(usize, Vec<bool>)> {
        let gates: Vec<GateId> = gates.into_iter().map(GateId::from).collect();
        let mut results = vec![false; gates.len()];
        let path = self.inner.evaluate(&gates, &mut results)?;
        Ok((path, results))
    }

    fn fan_out(&self, gate: u64) -> PyResult<usize> {
        Ok(self.inner.fan_out(GateId::from(gate))?)
    }

    /// What feeds an input slot: a `Signal`, a gate handle, or `None`.
    fn input_at(&self, py: Python<'_>, gate: u64, slot: u32) -> PyResult<PyObject> {
        Ok(match self.inner.input_at(GateId::from(gate), slot)? {
            Input::Signal(signal) => Py::new(py, PySignal { inner: signal })?.into_py(py),
            Input::Gate(source) => source.raw().into_py(py),
            Input::Empty => py.None(),
        })
    }

    fn output_at(&self, gate: u64, index: usize) -> Option<u64> {
        self.inner.output_at(GateId::from(gate), index).map(|id| id.raw())
    }

    fn outputs(&self, gate: u64) -> Vec<u64> {
        self.inner
            .outputs(GateId::from(gate))
            .map(|id| id.raw())
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.gate_count()
    }

    fn __repr__(&self) -> String {
        format!("Circuit(gates={})", self.inner.gate_count())
    }
}
