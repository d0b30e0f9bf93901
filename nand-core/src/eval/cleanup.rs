//! Post-Evaluation Cleanup
//!
//! Resets every gate an evaluation touched back to `Unvisited`. The walk
//! starts at the batch roots, follows gate-sourced slots only, and stops at
//! gates that are already unvisited. Every gate an evaluation marks is
//! reached from a root through other marked gates, so nothing is missed,
//! and resetting a gate before looking at its inputs keeps the walk finite
//! on cyclic wiring.

use indexmap::IndexMap;

use crate::graph::{Cable, EvalState, Gate, GateId};

/// Reset the evaluation state of everything reachable from `roots`.
///
/// Unknown roots are skipped. Returns the number of gates reset.
pub(crate) fn reset_from(gates: &mut IndexMap<GateId, Gate>, roots: &[GateId]) -> usize {
    let mut pending: Vec<GateId> = roots.to_vec();
    let mut reset = 0;

    while let Some(id) = pending.pop() {
        let Some(gate) = gates.get_mut(&id) else {
            continue;
        };
        if gate.state == EvalState::Unvisited {
            continue;
        }

        gate.reset();
        reset += 1;

        pending.extend(gate.cables().filter_map(|cable| match cable {
            Cable::Gate(source) => Some(*source),
            Cable::Signal(_) => None,
        }));
    }

    reset
}
