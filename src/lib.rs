//! # Machina: pull-based stream transducers
//!
//! Build stream processors as lazy, immutable [`Machine`] values, compose
//! them, and drive them with external input.
//!
//! ## Core Types
//!
//! - **[`Machine<K, O>`]**: a lazy tree of [`Step`]s over the input shape `K`
//! - **[`Plan<K, O, R>`]**: straight-line description of a machine, compiled with
//!   [`compile`] or [`repeatedly`]
//! - **[`Shape`]**: which inputs a machine may await: [`Process`], [`Tee`] or [`Source`]
//!
//! ## Key Features
//!
//! - **Demand driven**: nothing upstream runs until something downstream asks for it
//! - **Composable**: pipe with [`compose`], merge two inputs with [`tee`]
//! - **Typed channels**: a two-input machine awaits an `A` on the left and a `B` on the right
//! - **Sync and async driving**: [`run`], [`drive`] and [`run_async`]
//!
//! ## Example
//!
//! ```
//! use machina::prelude::*;
//!
//! // keep the even numbers and group them in pairs
//! let pipeline = filter(|x: &u32| x % 2 == 0).pipe(buffer(2));
//! assert_eq!(run(pipeline, feed(1..=7)), vec![vec![2, 4], vec![6]]);
//!
//! // label a stream by cycling through a fixed source
//! let labelled = cap_left(cycle_sequence(["even", "odd"]), zipping());
//! assert_eq!(run(labelled, feed([0, 1, 2])), vec![("even", 0), ("odd", 1), ("even", 2)]);
//! ```
//!
//! ## Common Functions
//!
//! **Plans:**
//! - [`input()`] / [`awaits(handle)`](awaits) - Await one value
//! - [`emit(value)`](emit) - Produce one value
//! - [`stop()`] / [`fail()`] - End the branch; [`Plan::or`] recovers
//!
//! **Combinators:**
//! - [`echo()`], [`mapping(f)`](mapping), [`filter(p)`](filter), [`buffer(n)`](buffer)
//! - [`take_first(n)`](take_first), [`drop_first(n)`](drop_first)
//! - [`take_while(p)`](take_while), [`drop_while(p)`](drop_while)
//! - [`zip_with(f)`](zip_with), [`alternate()`] - Tee bodies
//!
//! **Execution:**
//! - [`run(machine, provider)`](run) - Collect every output
//! - [`drive(machine, provider)`](drive) - Iterate over outputs
//! - [`run_async(process, responder)`](run_async) - Drive with async responses

pub mod build;
pub mod combinators;
pub mod compose;
mod config;
mod error;
pub mod handler;
mod machine;
pub mod plan;
pub mod prelude;
pub mod shape;
mod step;

pub use build::*;
pub use combinators::*;
pub use compose::*;
pub use config::DriveConfig;
pub use error::{BoxError, DriveError};
pub use handler::*;
pub use machine::*;
pub use plan::{Plan, awaits, before, compile, done, emit, fail, input, repeatedly, stop};
pub use shape::*;
pub use step::*;
