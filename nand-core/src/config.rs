//! Circuit Configuration
//!
//! Tunables for a [`Circuit`](crate::graph::Circuit). Configurations can be
//! built in code or parsed from JSON; missing fields take their defaults.
//!
//! ```json
//! { "initial_fan_out_capacity": 4, "max_eval_depth": 10000 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};

/// Default number of consumer entries allocated on a gate's first fan-out.
pub const DEFAULT_FAN_OUT_CAPACITY: usize = 2;

/// Largest accepted initial fan-out capacity. Anything bigger would make
/// the first connection of every gate fail to allocate.
pub const MAX_INITIAL_FAN_OUT_CAPACITY: usize = 1 << 20;

/// Configuration for a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Capacity of a gate's output-link storage when it is first allocated.
    /// The storage doubles whenever it fills up.
    pub initial_fan_out_capacity: usize,

    /// Longest dependency chain evaluation will follow before canceling.
    /// `None` means unlimited; cycle detection still guarantees termination.
    pub max_eval_depth: Option<usize>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            initial_fan_out_capacity: DEFAULT_FAN_OUT_CAPACITY,
            max_eval_depth: None,
        }
    }
}

impl CircuitConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CircuitError::invalid(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the evaluation depth limit.
    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = Some(depth);
        self
    }

    /// Set the initial fan-out capacity.
    pub fn with_initial_fan_out_capacity(mut self, capacity: usize) -> Self {
        self.initial_fan_out_capacity = capacity;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.initial_fan_out_capacity == 0 {
            return Err(CircuitError::invalid(
                "initial_fan_out_capacity must be at least 1",
            ));
        }
        if self.initial_fan_out_capacity > MAX_INITIAL_FAN_OUT_CAPACITY {
            return Err(CircuitError::invalid(format!(
                "initial_fan_out_capacity must be at most {MAX_INITIAL_FAN_OUT_CAPACITY}"
            )));
        }
        if self.max_eval_depth == Some(0) {
            return Err(CircuitError::invalid("max_eval_depth must be at least 1"));
        }
        Ok(())
    }
}
