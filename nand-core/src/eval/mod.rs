//! Circuit Evaluation
//!
//! This module computes output signals and critical paths.
//!
//! # Overview
//!
//! Evaluation walks backwards from the requested gates through their input
//! cables. Each gate carries a transient marker:
//!
//! - `Unvisited`: not reached in this batch
//! - `InProgress`: its inputs are being read; reaching it again is a cycle
//! - `Computed(path)`: its signal and critical path are cached
//!
//! A batch call evaluates its gates in order, then resets every marker it
//! set, whether it succeeded or not. The circuit can be rewired and
//! evaluated again straight away.
//!
//! # Critical Path
//!
//! A gate without inputs has path 0. Any other gate has path one more than
//! the longest path among its gate inputs; signal inputs count as 0.

mod batch;
mod cleanup;
mod evaluator;
