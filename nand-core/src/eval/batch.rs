//! Batch Evaluation
//!
//! Entry point for evaluating several output gates at once. Gates are
//! evaluated in order and share cached results, so common subcircuits are
//! computed once per call. Whatever happens, the transient state of every
//! gate the call touched is reset before it returns.

use tracing::{debug, warn};

use super::cleanup::reset_from;
use super::evaluator::Evaluator;
use crate::error::{CircuitError, Result};
use crate::graph::{Circuit, GateId};

impl Circuit {
    /// Evaluate `gates` in order, writing each output into `results`.
    ///
    /// Returns the longest critical path among the evaluated gates.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `gates` is empty, `results` is shorter than
    ///   `gates`, or an entry does not name a gate of this circuit.
    /// - `OperationCanceled` if a gate depends on a cycle or an unconnected
    ///   input, or the chain exceeds the configured depth limit. Later gates
    ///   are not evaluated.
    ///
    /// Results of gates evaluated before a failure are still written.
    pub fn evaluate(&mut self, gates: &[GateId], results: &mut [bool]) -> Result<usize> {
        if gates.is_empty() {
            return Err(CircuitError::invalid("no gates to evaluate"));
        }
        if results.len() < gates.len() {
            return Err(CircuitError::invalid(format!(
                "result buffer holds {} values for {} gates",
                results.len(),
                gates.len()
            )));
        }

        debug!(gates = gates.len(), "evaluating circuit");
        let outcome = self.evaluate_in_order(gates, results);
        let reset = reset_from(&mut self.gates, gates);

        match &outcome {
            Ok(path) => debug!(critical_path = path, reset, "evaluation finished"),
            Err(CircuitError::OperationCanceled(failure)) => {
                warn!(%failure, reset, "evaluation canceled")
            }
            Err(e) => debug!(error = %e, reset, "evaluation rejected"),
        }
        outcome
    }

    /// Evaluate a single gate, returning its output and critical path.
    pub fn evaluate_one(&mut self, gate: GateId) -> Result<(bool, usize)> {
        let mut result = [false];
        let path = self.evaluate(&[gate], &mut result)?;
        Ok((result[0], path))
    }

    fn evaluate_in_order(&mut self, gates: &[GateId], results: &mut [bool]) -> Result<usize> {
        let max_depth = self.config.max_eval_depth;
        let mut evaluator = Evaluator::new(&mut self.gates, max_depth);
        let mut critical_path = 0;

        for (&gate, result) in gates.iter().zip(results.iter_mut()) {
            if !evaluator.contains(gate) {
                return Err(CircuitError::unknown_gate(gate));
            }
            let (signal, path) = evaluator.evaluate(gate)?;
            *result = signal;
            critical_path = critical_path.max(path);
        }

        Ok(critical_path)
    }
}
