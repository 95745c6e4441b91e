//! Nodes of a machine.

use std::fmt;

use crate::{
    machine::Machine,
    shape::{Channel, Shape},
};

/// One node of a machine: the result of stepping it once.
///
/// A machine is a lazily produced tree of these nodes. Stepping a
/// [`Machine`] evaluates just enough of it to expose the next node.
///
/// # Examples
///
/// ```rust
/// use machina::prelude::*;
///
/// let source: Source<u32> = from_sequence([7]);
/// let (first, rest) = source.step().unwrap_emit();
/// assert_eq!(first, 7);
/// assert!(rest.step().is_halt());
/// ```
pub enum Step<K: Shape, O: 'static> {
    /// Produce one output, then continue as the given machine.
    Emit(O, Machine<K, O>),
    /// Ask for one input. The request carries the channel and the typed
    /// continuation; the second field runs when that channel is exhausted.
    Await(K::Request<Machine<K, O>>, Machine<K, O>),
    /// No further output.
    Halt,
}

impl<K: Shape, O: 'static> Step<K, O> {
    /// Returns `true` if the step is `Emit`.
    #[inline]
    pub const fn is_emit(&self) -> bool {
        matches!(self, Step::Emit(..))
    }

    /// Returns `true` if the step is `Await`.
    #[inline]
    pub const fn is_await(&self) -> bool {
        matches!(self, Step::Await(..))
    }

    /// Returns `true` if the step is `Halt`.
    #[inline]
    pub const fn is_halt(&self) -> bool {
        matches!(self, Step::Halt)
    }

    /// The channel an `Await` step waits on, if any.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Step::Await(request, _) => Some(K::channel(request)),
            _ => None,
        }
    }

    /// Converts the step into its emitted value, discarding the continuation.
    #[inline]
    pub fn emitted(self) -> Option<O> {
        match self {
            Step::Emit(output, _) => Some(output),
            _ => None,
        }
    }

    /// Maps the emitted value of an `Emit` step, leaving other steps untouched.
    pub fn map_emitted<F>(self, f: F) -> Step<K, O>
    where
        F: FnOnce(O) -> O,
    {
        match self {
            Step::Emit(output, next) => Step::Emit(f(output), next),
            other => other,
        }
    }

    /// Returns the output and continuation of an `Emit` step.
    ///
    /// # Panics
    ///
    /// Panics with `msg` if the step is not `Emit`.
    #[inline]
    #[track_caller]
    pub fn expect_emit(self, msg: &str) -> (O, Machine<K, O>) {
        match self {
            Step::Emit(output, next) => (output, next),
            _ => panic!("{msg}"),
        }
    }

    /// Returns the output and continuation of an `Emit` step.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Await` or `Halt`.
    #[inline]
    #[track_caller]
    pub fn unwrap_emit(self) -> (O, Machine<K, O>) {
        match self {
            Step::Emit(output, next) => (output, next),
            Step::Await(request, _) => panic!(
                "called `Step::unwrap_emit()` on an `Await` value (channel {})",
                K::channel(&request)
            ),
            Step::Halt => panic!("called `Step::unwrap_emit()` on a `Halt` value"),
        }
    }

    /// Returns the request and fallback of an `Await` step.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Emit` or `Halt`.
    #[inline]
    #[track_caller]
    pub fn unwrap_await(self) -> (K::Request<Machine<K, O>>, Machine<K, O>) {
        match self {
            Step::Await(request, fallback) => (request, fallback),
            Step::Emit(..) => panic!("called `Step::unwrap_await()` on an `Emit` value"),
            Step::Halt => panic!("called `Step::unwrap_await()` on a `Halt` value"),
        }
    }
}

impl<K: Shape, O: fmt::Debug + 'static> fmt::Debug for Step<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Emit(output, _) => f.debug_tuple("Emit").field(output).finish(),
            Step::Await(request, _) => f.debug_tuple("Await").field(&K::channel(request)).finish(),
            Step::Halt => f.write_str("Halt"),
        }
    }
}
