//! The compiled, lazily evaluated machine.
//!
//! A [`Machine`] is an immutable value. Stepping it exposes one [`Step`] and
//! the machine to continue with; the original is left untouched and can be
//! stepped again with the same result. Nothing beyond the requested node is
//! ever evaluated, so an infinite chain of emits costs one node per step.

use std::{fmt, rc::Rc};

use crate::{
    compose::{compose, map_output},
    shape::{Is, Nil, Shape, T},
    step::Step,
};

/// A lazy tree of [`Step`] nodes over input shape `K`, emitting `O`.
pub struct Machine<K: Shape, O: 'static> {
    node: Rc<dyn Fn() -> Step<K, O>>,
}

/// A machine with one input channel.
pub type Process<I, O> = Machine<Is<I>, O>;

/// A machine with two input channels.
pub type Tee<A, B, O> = Machine<T<A, B>, O>;

/// A machine that never awaits. Use [`Machine::widen`] to run it where a
/// machine of another shape is expected.
pub type Source<O> = Machine<Nil, O>;

impl<K: Shape, O: 'static> Machine<K, O> {
    /// Create a machine whose next node is computed by `node` on demand.
    ///
    /// `node` is called every time the machine is stepped and must produce the
    /// same node each time.
    pub fn new<F>(node: F) -> Self
    where
        F: Fn() -> Step<K, O> + 'static,
    {
        Machine {
            node: Rc::new(node),
        }
    }

    /// Evaluate the next node.
    #[inline]
    pub fn step(&self) -> Step<K, O> {
        (self.node)()
    }

    /// The machine that stops immediately.
    pub fn halt() -> Self {
        Machine::new(|| Step::Halt)
    }

    /// Emit `output`, then continue as `next`.
    pub fn emit(output: O, next: Self) -> Self
    where
        O: Clone,
    {
        Machine::new(move || Step::Emit(output.clone(), next.clone()))
    }

    /// A machine built by `f` only once it is stepped.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Self + 'static,
    {
        Machine::new(move || f().step())
    }

    /// Feed every output of this machine into `downstream`.
    ///
    /// ```rust
    /// use machina::prelude::*;
    ///
    /// let evens = from_sequence(1..=6_u32).pipe(filter(|x: &u32| x % 2 == 0));
    /// assert_eq!(run(evens, no_input()), vec![2, 4, 6]);
    /// ```
    pub fn pipe<C: 'static>(self, downstream: Process<O, C>) -> Machine<K, C> {
        compose(self, downstream)
    }

    /// Transform every output.
    pub fn map_output<P, F>(self, f: F) -> Machine<K, P>
    where
        P: 'static,
        F: Fn(O) -> P + 'static,
    {
        map_output(self, f)
    }

    /// Run this machine until it halts, then continue as `next`.
    ///
    /// Awaits keep their channel; their fallbacks are chained onto `next` as
    /// well, so `next` runs however this machine ends.
    pub fn chain(self, next: Self) -> Self {
        Machine::new(move || match self.step() {
            Step::Emit(output, rest) => Step::Emit(output, rest.chain(next.clone())),
            Step::Await(request, fallback) => {
                let then = next.clone();
                Step::Await(
                    K::map_request(request, move |resumed: Machine<K, O>| {
                        resumed.chain(then.clone())
                    }),
                    fallback.chain(next.clone()),
                )
            }
            Step::Halt => next.step(),
        })
    }
}

impl<O: 'static> Machine<Nil, O> {
    /// View a source as a machine of any shape. It still never awaits.
    pub fn widen<K: Shape>(self) -> Machine<K, O> {
        Machine::new(move || match self.step() {
            Step::Emit(output, next) => Step::Emit(output, next.widen()),
            Step::Await(request, _) => match request {},
            Step::Halt => Step::Halt,
        })
    }
}

impl<K: Shape, O: 'static> Clone for Machine<K, O> {
    fn clone(&self) -> Self {
        Machine {
            node: Rc::clone(&self.node),
        }
    }
}

impl<K: Shape, O: 'static> fmt::Debug for Machine<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine").finish_non_exhaustive()
    }
}
