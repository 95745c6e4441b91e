//! Ready-made machines built from plans.
//!
//! Most combinators come in two forms: a `*_on` variant that reads through a
//! [`Handle`](crate::Handle) and so works on any shape, and a plain variant
//! specialised to the only input of a process.

mod buffer;
mod filter;
mod func;
mod take;
mod zip;

pub use buffer::{buffer, buffer_on};
pub use filter::{filter, filter_on};
pub use func::{echo, echo_on, fold, mapping, prepended, scan};
pub use take::{
    drop_first, drop_first_on, drop_while, drop_while_on, take_first, take_first_on, take_while,
    take_while_on,
};
pub use zip::{alternate, zip_with, zipping};
