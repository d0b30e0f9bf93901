//! Error Types
//!
//! Every fallible circuit operation returns [`Result`], carrying a
//! [`CircuitError`] on failure. Errors fall into three kinds:
//!
//! - `InvalidArgument`: unknown gate handles, out-of-range slots, empty batches
//! - `OutOfMemory`: storage for a gate or its fan-out could not be allocated
//! - `OperationCanceled`: evaluation hit a cycle, an unconnected input, or the
//!   configured depth limit
//!
//! For callers bridging to C-style interfaces, [`CircuitError::errno`] gives
//! the matching `errno` value.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::graph::GateId;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CircuitError>;

/// `EINVAL` on Linux.
pub const EINVAL: i32 = 22;
/// `ENOMEM` on Linux.
pub const ENOMEM: i32 = 12;
/// `ECANCELED` on Linux.
pub const ECANCELED: i32 = 125;

/// Why an evaluation was abandoned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFailure {
    /// The gate was reached again while it was still being computed.
    #[error("cycle detected at {0}")]
    Cycle(GateId),

    /// An input slot had nothing connected to it.
    #[error("input {slot} of {gate} is not connected")]
    MissingInput { gate: GateId, slot: u32 },

    /// The dependency chain is deeper than the configured limit.
    #[error("evaluation depth exceeded the limit of {0}")]
    DepthLimit(usize),
}

/// Coarse category of a [`CircuitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfMemory,
    OperationCanceled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Out of memory: {0}")]
    OutOfMemory(String),
    #[error("Operation canceled: {0}")]
    OperationCanceled(#[from] EvalFailure),
}

impl CircuitError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CircuitError::InvalidArgument(message.into())
    }

    pub(crate) fn unknown_gate(gate: GateId) -> Self {
        CircuitError::InvalidArgument(format!("{gate} does not exist"))
    }

    pub(crate) fn slot_out_of_range(gate: GateId, slot: u32, inputs: u32) -> Self {
        CircuitError::InvalidArgument(format!(
            "slot {slot} is out of range for {gate} with {inputs} inputs"
        ))
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CircuitError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CircuitError::OutOfMemory(_) => ErrorKind::OutOfMemory,
            CircuitError::OperationCanceled(_) => ErrorKind::OperationCanceled,
        }
    }

    /// The `errno` value a C caller would observe for this error.
    pub fn errno(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgument => EINVAL,
            ErrorKind::OutOfMemory => ENOMEM,
            ErrorKind::OperationCanceled => ECANCELED,
        }
    }

    /// The evaluation failure behind a canceled operation, if any.
    pub fn eval_failure(&self) -> Option<EvalFailure> {
        match self {
            CircuitError::OperationCanceled(failure) => Some(*failure),
            _ => None,
        }
    }
}

impl From<TryReserveError> for CircuitError {
    fn from(err: TryReserveError) -> Self {
        CircuitError::OutOfMemory(err.to_string())
    }
}

impl From<smallvec::CollectionAllocErr> for CircuitError {
    fn from(err: smallvec::CollectionAllocErr) -> Self {
        CircuitError::OutOfMemory(format!("{err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_errno() {
        let gate = GateId::from(7);

        assert_eq!(CircuitError::unknown_gate(gate).errno(), EINVAL);
        assert_eq!(CircuitError::OutOfMemory("fan-out".into()).errno(), ENOMEM);
        assert_eq!(CircuitError::from(EvalFailure::Cycle(gate)).errno(), ECANCELED);
    }

    #[test]
    fn canceled_error_exposes_failure() {
        let gate = GateId::from(3);
        let err = CircuitError::from(EvalFailure::MissingInput { gate, slot: 1 });

        assert_eq!(err.kind(), ErrorKind::OperationCanceled);
        assert_eq!(
            err.eval_failure(),
            Some(EvalFailure::MissingInput { gate, slot: 1 })
        );
        assert!(err.to_string().contains("input 1 of gate#3"));
    }

    #[test]
    fn reserve_failure_is_out_of_memory() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();

        assert_eq!(CircuitError::from(err).kind(), ErrorKind::OutOfMemory);
    }
}
