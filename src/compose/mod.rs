//! Combining machines together
//!
//! This module provides sequential composition ([`compose`]), two-input
//! composition ([`tee`] and its one-sided forms) and output transformation.

mod map;
mod pipe;
mod tee;

// Re-export composition operations
pub use map::map_output;
pub use pipe::compose;
pub use tee::{add_left, add_right, cap_left, cap_right, tee};
