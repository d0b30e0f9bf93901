//! Gates and Cables
//!
//! This module defines the gate type that lives in the circuit arena and the
//! cables that feed its input slots.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use super::signal::Signal;
use crate::error::Result;

/// Unique identifier for a gate.
///
/// IDs are never reused, so a handle to a destroyed gate stays invalid
/// instead of silently aliasing a newer gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(u64);

impl GateId {
    /// Generate a new unique gate ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for GateId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for GateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate#{}", self.0)
    }
}

/// A connection into one input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cable {
    /// Reads an externally-owned boolean.
    Signal(Signal),
    /// Reads another gate's output.
    Gate(GateId),
}

/// What occupies an input slot, as seen from outside the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Signal(Signal),
    Gate(GateId),
    /// Nothing is connected.
    Empty,
}

impl Input {
    pub(crate) fn from_cable(cable: Option<&Cable>) -> Self {
        match cable {
            Some(Cable::Signal(signal)) => Input::Signal(signal.clone()),
            Some(Cable::Gate(source)) => Input::Gate(*source),
            None => Input::Empty,
        }
    }
}

/// Evaluation marker of a gate.
///
/// Only meaningful inside a single batch evaluation; every batch resets the
/// gates it touched back to `Unvisited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum EvalState {
    #[default]
    Unvisited,
    /// Being computed; reaching it again means the wiring has a cycle.
    InProgress,
    /// Done, with the given critical path length.
    Computed(usize),
}

/// A NAND gate in the circuit.
#[derive(Debug)]
pub struct Gate {
    id: GateId,

    /// One entry per input slot. The length is fixed at creation.
    inputs: SmallVec<[Option<Cable>; 2]>,

    /// Gates reading this gate's output, once per consuming slot.
    outputs: Vec<GateId>,

    /// Output computed by the current evaluation.
    pub(crate) signal: bool,

    pub(crate) state: EvalState,
}

impl Gate {
    /// Create a gate with `input_count` empty slots.
    ///
    /// Fails with `OutOfMemory` if the slots cannot be reserved. The slots
    /// are written right after, so memory the allocator promised but cannot
    /// back aborts the process instead.
    pub(crate) fn with_inputs(id: GateId, input_count: u32) -> Result<Self> {
        let mut inputs: SmallVec<[Option<Cable>; 2]> = SmallVec::new();
        inputs.try_reserve_exact(input_count as usize)?;
        inputs.extend(std::iter::repeat_with(|| None).take(input_count as usize));

        Ok(Self {
            id,
            inputs,
            outputs: Vec::new(),
            signal: false,
            state: EvalState::Unvisited,
        })
    }

    /// Get the gate's ID.
    pub fn id(&self) -> GateId {
        self.id
    }

    /// Number of input slots.
    pub fn input_count(&self) -> u32 {
        self.inputs.len() as u32
    }

    /// Number of consumer entries, duplicates included.
    pub fn fan_out(&self) -> usize {
        self.outputs.len()
    }

    pub(crate) fn cable(&self, slot: u32) -> Option<&Cable> {
        self.inputs.get(slot as usize).and_then(Option::as_ref)
    }

    pub(crate) fn cables(&self) -> impl Iterator<Item = &Cable> {
        self.inputs.iter().flatten()
    }

    /// Put `cable` into `slot`, returning what was there before.
    ///
    /// The caller has checked that `slot` is in range.
    pub(crate) fn replace_cable(&mut self, slot: u32, cable: Option<Cable>) -> Option<Cable> {
        std::mem::replace(&mut self.inputs[slot as usize], cable)
    }

    /// Empty every slot that reads from `source`.
    pub(crate) fn unplug_source(&mut self, source: GateId) -> usize {
        let mut cleared = 0;
        for slot in self.inputs.iter_mut() {
            if matches!(slot, Some(Cable::Gate(id)) if *id == source) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }

    pub(crate) fn outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Make room for one more consumer entry.
    ///
    /// Storage is allocated with `initial` entries on first use and doubles
    /// whenever it is full. On failure nothing changes.
    pub(crate) fn reserve_output(&mut self, initial: usize) -> Result<()> {
        if self.outputs.len() < self.outputs.capacity() {
            return Ok(());
        }
        let additional = match self.outputs.capacity() {
            0 => initial,
            capacity => capacity,
        };
        self.outputs.try_reserve_exact(additional)?;
        Ok(())
    }

    /// Record a consumer. `reserve_output` must have succeeded first.
    pub(crate) fn push_output(&mut self, consumer: GateId) {
        debug_assert!(self.outputs.len() < self.outputs.capacity());
        self.outputs.push(consumer);
    }

    /// Remove a single occurrence of `consumer`, keeping the others.
    pub(crate) fn remove_output(&mut self, consumer: GateId) -> bool {
        match self.outputs.iter().position(|&id| id == consumer) {
            Some(index) => {
                self.outputs.remove(index);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn output_capacity(&self) -> usize {
        self.outputs.capacity()
    }

    /// Forget any evaluation result.
    pub(crate) fn reset(&mut self) {
        self.state = EvalState::Unvisited;
        self.signal = false;
    }
}
