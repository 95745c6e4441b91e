//! Building machines from values rather than plans.
//!
//! Sources produce output without ever awaiting. Automata adapt a Moore or
//! Mealy machine into a process.

mod auto;
mod sequence;

pub use auto::{Mealy, Moore, auto_mealy, auto_moore};
pub use sequence::{cycle_sequence, drive_with, from_sequence, repeated, stopped, unfold};
