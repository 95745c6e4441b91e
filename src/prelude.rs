//! Commonly used imports
//!
//! Use `use machina::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Machine, Plan, Process, Source, Step, Tee};

// Shapes and handles
pub use crate::shape::{Channel, Left, Right, Single};

// Plans
pub use crate::plan::{awaits, compile, done, emit, fail, input, repeatedly, stop};

// Sources and automata
pub use crate::build::{
    Mealy, Moore, auto_mealy, auto_moore, cycle_sequence, drive_with, from_sequence, repeated,
    unfold,
};

// Composition
pub use crate::compose::{add_left, add_right, cap_left, cap_right, compose, map_output, tee};

// Combinators
pub use crate::combinators::{
    alternate, buffer, drop_first, drop_while, echo, filter, fold, mapping, scan, take_first,
    take_while, zip_with, zipping,
};

// Execution
pub use crate::handler::{
    drive, fallible, feed, feed_both, from_fn, no_input, run, run_async, run_fallible,
};
pub use crate::{DriveConfig, DriveError};
