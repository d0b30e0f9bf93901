//! Gate Evaluator
//!
//! Computes the output signal and critical path of a gate by walking its
//! input cables depth-first. The walk keeps its own stack of frames instead
//! of recursing, so the depth of a circuit is limited by heap memory (or the
//! configured cap) rather than by the thread's stack.
//!
//! # Per-Gate Rules
//!
//! - A gate already computed in this batch returns its cached result.
//! - A gate reached while still in progress closes a cycle.
//! - A gate without inputs outputs `false` with path 0.
//! - Otherwise slots are read in order. An empty slot fails the evaluation.
//!   Any `false` input forces the output to `true` (NAND). Signal inputs
//!   contribute path 0, gate inputs contribute the source's path, and the
//!   gate's path is the largest contribution plus one.
//!
//! The first failing slot in left-to-right order decides the reported error.

use indexmap::IndexMap;

use crate::error::EvalFailure;
use crate::graph::{Cable, EvalState, Gate, GateId};

/// Partial result of a gate whose inputs are being read.
#[derive(Debug)]
struct Frame {
    gate: GateId,
    /// Next slot to read.
    slot: u32,
    /// True once any input was false.
    signal: bool,
    /// Longest path among gate inputs read so far.
    path: usize,
}

impl Frame {
    fn new(gate: GateId) -> Self {
        Self {
            gate,
            slot: 0,
            signal: false,
            path: 0,
        }
    }

    /// Fold one input into the partial result and move to the next slot.
    fn absorb(&mut self, input: bool, path: usize) {
        if !input {
            self.signal = true;
        }
        self.path = self.path.max(path);
        self.slot += 1;
    }
}

/// What to do with the slot a frame is looking at.
enum Step {
    /// Every slot has been read.
    Finish,
    /// The slot's value is known.
    Absorb(bool, usize),
    /// The slot reads a gate that has not been visited yet.
    Descend(GateId),
}

/// Evaluates gates against the circuit's transient evaluation state.
///
/// Results are cached in the gates themselves until the batch is cleaned up,
/// so a subgraph shared by several roots is computed once.
pub(crate) struct Evaluator<'a> {
    gates: &'a mut IndexMap<GateId, Gate>,
    max_depth: Option<usize>,
    stack: Vec<Frame>,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(gates: &'a mut IndexMap<GateId, Gate>, max_depth: Option<usize>) -> Self {
        Self {
            gates,
            max_depth,
            stack: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, gate: GateId) -> bool {
        self.gates.contains_key(&gate)
    }

    /// Compute the output signal and critical path of `root`.
    ///
    /// `root` must exist. On failure the gates visited so far keep whatever
    /// state they reached; cleanup resets them.
    pub(crate) fn evaluate(&mut self, root: GateId) -> Result<(bool, usize), EvalFailure> {
        self.stack.clear();

        if let Some(result) = self.enter(root)? {
            return Ok(result);
        }

        loop {
            match self.next_step()? {
                Step::Absorb(input, path) => self.top().absorb(input, path),
                Step::Descend(source) => {
                    if let Some((input, path)) = self.enter(source)? {
                        self.top().absorb(input, path);
                    }
                }
                Step::Finish => {
                    let (signal, path) = self.finish();
                    match self.stack.last_mut() {
                        Some(parent) => parent.absorb(signal, path),
                        None => return Ok((signal, path)),
                    }
                }
            }
        }
    }

    fn top(&mut self) -> &mut Frame {
        self.stack
            .last_mut()
            .expect("evaluation stack holds the gate being read")
    }

    /// Start on an unvisited gate or look up a visited one.
    ///
    /// Returns the result right away for cached and input-less gates, or
    /// `None` after pushing a frame for a gate whose inputs must be read.
    fn enter(&mut self, id: GateId) -> Result<Option<(bool, usize)>, EvalFailure> {
        let gate = self.gates.get_mut(&id).expect("cable source is in the circuit");

        match gate.state {
            EvalState::Computed(path) => return Ok(Some((gate.signal, path))),
            EvalState::InProgress => return Err(EvalFailure::Cycle(id)),
            EvalState::Unvisited => {}
        }

        if gate.input_count() == 0 {
            gate.signal = false;
            gate.state = EvalState::Computed(0);
            return Ok(Some((false, 0)));
        }

        if let Some(limit) = self.max_depth {
            if self.stack.len() >= limit {
                return Err(EvalFailure::DepthLimit(limit));
            }
        }

        gate.state = EvalState::InProgress;
        self.stack.push(Frame::new(id));
        Ok(None)
    }

    /// Read the slot the top frame points at.
    fn next_step(&self) -> Result<Step, EvalFailure> {
        let frame = self
            .stack
            .last()
            .expect("evaluation stack holds the gate being read");
        let gate = &self.gates[&frame.gate];

        if frame.slot == gate.input_count() {
            return Ok(Step::Finish);
        }

        match gate.cable(frame.slot) {
            None => Err(EvalFailure::MissingInput {
                gate: frame.gate,
                slot: frame.slot,
            }),
            Some(Cable::Signal(signal)) => Ok(Step::Absorb(signal.get(), 0)),
            Some(Cable::Gate(source)) => {
                let source_gate = &self.gates[source];
                match source_gate.state {
                    EvalState::Computed(path) => Ok(Step::Absorb(source_gate.signal, path)),
                    EvalState::InProgress => Err(EvalFailure::Cycle(*source)),
                    EvalState::Unvisited => Ok(Step::Descend(*source)),
                }
            }
        }
    }

    /// Pop the top frame and record its result on the gate.
    fn finish(&mut self) -> (bool, usize) {
        let frame = self
            .stack
            .pop()
            .expect("evaluation stack holds the gate being read");
        let path = frame.path + 1;

        let gate = self
            .gates
            .get_mut(&frame.gate)
            .expect("evaluated gate is in the circuit");
        gate.signal = frame.signal;
        gate.state = EvalState::Computed(path);

        (frame.signal, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Circuit, Signal};

    fn eval(circuit: &mut Circuit, gate: GateId) -> Result<(bool, usize), EvalFailure> {
        Evaluator::new(&mut circuit.gates, None).evaluate(gate)
    }

    #[test]
    fn gate_without_inputs_is_false() {
        let mut circuit = Circuit::new();
        let gate = circuit.create_gate(0).unwrap();

        assert_eq!(eval(&mut circuit, gate), Ok((false, 0)));
    }

    #[test]
    fn nand_truth_table() {
        let cases = [
            (false, false, true),
            (false, true, true),
            (true, false, true),
            (true, true, false),
        ];

        for (a, b, expected) in cases {
            let mut circuit = Circuit::new();
            let gate = circuit.create_gate(2).unwrap();
            circuit.connect_signal(&Signal::new(a), gate, 0).unwrap();
            circuit.connect_signal(&Signal::new(b), gate, 1).unwrap();

            assert_eq!(eval(&mut circuit, gate), Ok((expected, 1)), "{a} NAND {b}");
        }
    }

    #[test]
    fn path_follows_longest_input() {
        let mut circuit = Circuit::new();
        let t = Signal::new(true);

        // short: one gate; long: two gates in series.
        let short = circuit.create_gate(1).unwrap();
        let long1 = circuit.create_gate(1).unwrap();
        let long2 = circuit.create_gate(1).unwrap();
        let root = circuit.create_gate(3).unwrap();

        circuit.connect_signal(&t, short, 0).unwrap();
        circuit.connect_signal(&t, long1, 0).unwrap();
        circuit.connect_gate(long1, long2, 0).unwrap();
        circuit.connect_gate(short, root, 0).unwrap();
        circuit.connect_gate(long2, root, 1).unwrap();
        circuit.connect_signal(&t, root, 2).unwrap();

        // short = false, long1 = false, long2 = true; root sees a false input.
        assert_eq!(eval(&mut circuit, root), Ok((true, 3)));
    }

    #[test]
    fn results_are_cached_within_a_batch() {
        let mut circuit = Circuit::new();
        let t = Signal::new(true);

        let shared = circuit.create_gate(1).unwrap();
        let root = circuit.create_gate(2).unwrap();
        circuit.connect_signal(&t, shared, 0).unwrap();
        circuit.connect_gate(shared, root, 0).unwrap();
        circuit.connect_gate(shared, root, 1).unwrap();

        let mut evaluator = Evaluator::new(&mut circuit.gates, None);
        assert_eq!(evaluator.evaluate(root), Ok((true, 2)));

        // Flipping the input is not seen until the state is reset.
        t.set(false);
        assert_eq!(evaluator.evaluate(shared), Ok((false, 1)));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut circuit = Circuit::new();
        let gate = circuit.create_gate(1).unwrap();
        circuit.connect_gate(gate, gate, 0).unwrap();

        assert_eq!(eval(&mut circuit, gate), Err(EvalFailure::Cycle(gate)));
    }

    #[test]
    fn missing_input_is_reported_with_slot() {
        let mut circuit = Circuit::new();
        let gate = circuit.create_gate(2).unwrap();
        circuit.connect_signal(&Signal::new(true), gate, 0).unwrap();

        assert_eq!(
            eval(&mut circuit, gate),
            Err(EvalFailure::MissingInput { gate, slot: 1 })
        );
    }

    #[test]
    fn first_failing_slot_wins() {
        let mut circuit = Circuit::new();
        let looped = circuit.create_gate(1).unwrap();
        let root = circuit.create_gate(2).unwrap();

        circuit.connect_gate(looped, looped, 0).unwrap();
        circuit.connect_gate(looped, root, 0).unwrap();

        // Slot 0 closes a cycle before slot 1 is found empty.
        assert_eq!(eval(&mut circuit, root), Err(EvalFailure::Cycle(looped)));
    }

    #[test]
    fn depth_limit_cancels_deep_chains() {
        let mut circuit = Circuit::new();
        let mut prev = circuit.create_gate(0).unwrap();
        for _ in 0..10 {
            let next = circuit.create_gate(1).unwrap();
            circuit.connect_gate(prev, next, 0).unwrap();
            prev = next;
        }

        let result = Evaluator::new(&mut circuit.gates, Some(4)).evaluate(prev);
        assert_eq!(result, Err(EvalFailure::DepthLimit(4)));
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut circuit = Circuit::new();
        let first = circuit.create_gate(0).unwrap();
        let mut prev = first;
        for _ in 0..200_000 {
            let next = circuit.create_gate(1).unwrap();
            circuit.connect_gate(prev, next, 0).unwrap();
            prev = next;
        }

        // Even number of inverters after a false source.
        assert_eq!(eval(&mut circuit, prev), Ok((false, 200_000)));
    }
}
