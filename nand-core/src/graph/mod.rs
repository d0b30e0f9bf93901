//! Circuit Graph
//!
//! This module implements the gate graph that evaluation runs over.
//!
//! # Overview
//!
//! The circuit is a directed graph where:
//!
//! - Nodes are NAND gates with a fixed number of input slots
//! - Edges are cables: each input slot reads either an external [`Signal`]
//!   or the output of another gate
//!
//! Wiring is allowed to form cycles. They are not a valid combinational
//! circuit, and evaluation reports them instead of looping.
//!
//! # Design Decisions
//!
//! 1. Gates live in a single arena indexed by [`GateId`] rather than pointing
//!    at each other, so there are no ownership cycles and stale handles are
//!    detected instead of dangling.
//!
//! 2. Each gate stores both directions of its wiring: input cables name their
//!    source, and sources list their consumers. Destroying a gate can then
//!    unplug it from both sides without scanning the whole circuit.
//!
//! 3. A consumer that reads the same source from several slots is listed
//!    once per slot, and removing one slot removes one entry.

mod circuit;
mod gate;
mod signal;

pub use circuit::Circuit;
pub use gate::{Gate, GateId, Input};
pub use signal::Signal;

pub(crate) use gate::{Cable, EvalState};
