//! Circuit Arena
//!
//! The circuit owns every gate and keeps the two directions of each wire in
//! step: a gate-sourced cable in a consumer's input slot is always matched by
//! exactly one entry in the source's output list.
//!
//! # Mutation Rules
//!
//! 1. Any allocation an operation needs happens before the graph is touched,
//!    so an `OutOfMemory` failure leaves the circuit exactly as it was.
//! 2. Replacing or clearing a slot removes one back-link from the old source.
//! 3. Destroying a gate unplugs its own inputs, then clears every consumer
//!    slot that still reads from it.

use indexmap::IndexMap;
use tracing::{error, trace};

use super::gate::{Cable, Gate, GateId, Input};
use super::signal::Signal;
use crate::config::CircuitConfig;
use crate::error::{CircuitError, Result};

/// A combinational circuit of NAND gates.
///
/// Gates are addressed by [`GateId`] handles. A handle whose gate has been
/// destroyed is treated as absent by every operation.
#[derive(Debug, Default)]
pub struct Circuit {
    /// All gates, in creation order.
    pub(crate) gates: IndexMap<GateId, Gate>,

    pub(crate) config: CircuitConfig,
}

impl Circuit {
    /// Create an empty circuit with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with the given configuration.
    pub fn with_config(config: CircuitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gates: IndexMap::new(),
            config,
        })
    }

    /// Get the active configuration.
    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Create a gate with `input_count` empty input slots.
    ///
    /// The slots are reserved with a fallible allocation, so a request the
    /// allocator refuses returns `OutOfMemory`. Every slot is then written
    /// as empty; on a system that overcommits memory, a huge `input_count`
    /// can pass the reservation and still exhaust memory while the slots are
    /// filled. Each slot takes `size_of::<Option<Cable>>()` bytes.
    pub fn create_gate(&mut self, input_count: u32) -> Result<GateId> {
        self.gates.try_reserve(1).map_err(|e| {
            error!(error = %e, "no room for a new gate");
            CircuitError::OutOfMemory(e.to_string())
        })?;

        let id = GateId::new();
        let gate = Gate::with_inputs(id, input_count).map_err(|e| {
            error!(inputs = input_count, error = %e, "failed to allocate gate inputs");
            e
        })?;
        self.gates.insert(id, gate);

        trace!(gate = %id, inputs = input_count, "created gate");
        Ok(id)
    }

    /// Destroy a gate and every wire touching it.
    ///
    /// Consumers reading from the gate are left with empty slots. Destroying
    /// an unknown gate does nothing.
    ///
    /// Removal shifts the later gates down to keep [`Circuit::gate_ids`] in
    /// creation order, so each call is O(gate count) and tearing down a
    /// whole circuit gate by gate is quadratic. Dropping the `Circuit`
    /// releases everything at once.
    pub fn destroy_gate(&mut self, id: GateId) {
        let Some(gate) = self.gates.shift_remove(&id) else {
            return;
        };

        for cable in gate.cables() {
            if let Cable::Gate(source) = cable {
                if let Some(source) = self.gates.get_mut(source) {
                    source.remove_output(id);
                }
            }
        }

        for consumer in gate.outputs() {
            if let Some(consumer) = self.gates.get_mut(consumer) {
                consumer.unplug_source(id);
            }
        }

        trace!(gate = %id, fan_out = gate.fan_out(), "destroyed gate");
    }

    /// Connect `signal` to input `slot` of `gate`.
    ///
    /// Whatever occupied the slot before is disconnected.
    pub fn connect_signal(&mut self, signal: &Signal, gate: GateId, slot: u32) -> Result<()> {
        self.check_slot(gate, slot)?;

        let old = self.gate_mut(gate)?.replace_cable(slot, Some(Cable::Signal(signal.clone())));
        self.release_cable(gate, old);

        trace!(gate = %gate, slot, signal = signal.id(), "connected signal");
        Ok(())
    }

    /// Connect the output of `source` to input `slot` of `dest`.
    ///
    /// Whatever occupied the slot before is disconnected. `source` may equal
    /// `dest`; the resulting loop is reported when the circuit is evaluated.
    pub fn connect_gate(&mut self, source: GateId, dest: GateId, slot: u32) -> Result<()> {
        if !self.gates.contains_key(&source) {
            return Err(CircuitError::unknown_gate(source));
        }
        self.check_slot(dest, slot)?;

        let initial = self.config.initial_fan_out_capacity;
        self.gate_mut(source)?.reserve_output(initial).map_err(|e| {
            error!(gate = %source, error = %e, "failed to grow fan-out");
            e
        })?;

        let old = self.gate_mut(dest)?.replace_cable(slot, Some(Cable::Gate(source)));
        self.release_cable(dest, old);
        self.gate_mut(source)?.push_output(dest);

        trace!(source = %source, dest = %dest, slot, "connected gate");
        Ok(())
    }

    /// Clear input `slot` of `gate`.
    ///
    /// Clearing an empty slot is not an error.
    pub fn disconnect(&mut self, gate: GateId, slot: u32) -> Result<()> {
        self.check_slot(gate, slot)?;

        let old = self.gate_mut(gate)?.replace_cable(slot, None);
        self.release_cable(gate, old);

        trace!(gate = %gate, slot, "disconnected input");
        Ok(())
    }

    /// Number of input slots reading from `gate`, duplicates included.
    pub fn fan_out(&self, gate: GateId) -> Result<usize> {
        Ok(self.gate_ref(gate)?.fan_out())
    }

    /// What is connected to input `slot` of `gate`.
    pub fn input_at(&self, gate: GateId, slot: u32) -> Result<Input> {
        self.check_slot(gate, slot)?;
        Ok(Input::from_cable(self.gate_ref(gate)?.cable(slot)))
    }

    /// The `index`-th consumer of `gate`, or `None` past the end.
    ///
    /// A consumer reading the gate from several slots appears once per slot.
    /// Returns `None` for an unknown gate.
    pub fn output_at(&self, gate: GateId, index: usize) -> Option<GateId> {
        self.gates.get(&gate)?.outputs().get(index).copied()
    }

    /// Iterate over the consumers of `gate` in `output_at` order.
    pub fn outputs(&self, gate: GateId) -> impl Iterator<Item = GateId> + '_ {
        self.gates
            .get(&gate)
            .map(Gate::outputs)
            .unwrap_or_default()
            .iter()
            .copied()
    }

    /// Number of input slots of `gate`.
    pub fn input_count(&self, gate: GateId) -> Result<u32> {
        Ok(self.gate_ref(gate)?.input_count())
    }

    /// Check whether `gate` exists in this circuit.
    pub fn contains(&self, gate: GateId) -> bool {
        self.gates.contains_key(&gate)
    }

    /// Get a gate by ID.
    pub fn gate(&self, gate: GateId) -> Option<&Gate> {
        self.gates.get(&gate)
    }

    /// Iterate over all gate IDs in creation order.
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.gates.keys().copied()
    }

    /// Get the total number of gates in the circuit.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    fn gate_ref(&self, gate: GateId) -> Result<&Gate> {
        self.gates
            .get(&gate)
            .ok_or_else(|| CircuitError::unknown_gate(gate))
    }

    fn gate_mut(&mut self, gate: GateId) -> Result<&mut Gate> {
        self.gates
            .get_mut(&gate)
            .ok_or_else(|| CircuitError::unknown_gate(gate))
    }

    fn check_slot(&self, gate: GateId, slot: u32) -> Result<()> {
        let inputs = self.gate_ref(gate)?.input_count();
        if slot >= inputs {
            return Err(CircuitError::slot_out_of_range(gate, slot, inputs));
        }
        Ok(())
    }

    /// Drop the back-link of a cable removed from one of `owner`'s slots.
    fn release_cable(&mut self, owner: GateId, cable: Option<Cable>) {
        if let Some(Cable::Gate(source)) = cable {
            if let Some(source) = self.gates.get_mut(&source) {
                source.remove_output(owner);
            }
        }
    }
}
