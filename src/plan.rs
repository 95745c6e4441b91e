//! Plans: linear descriptions of a machine.
//!
//! A [`Plan`] reads like straight-line code: emit this, await that, then
//! continue with whatever came in. It is a pure value and does nothing on its
//! own; [`compile`] turns it into a [`Machine`], [`repeatedly`] into a machine
//! that restarts the plan each time it finishes.
//!
//! ```rust
//! use machina::prelude::*;
//!
//! // await two numbers, emit their sum, forever
//! let sums: Process<u32, u32> = repeatedly(
//!     input().and_then(|a: u32| input().and_then(move |b: u32| emit(a + b))),
//! );
//! assert_eq!(run(sums, feed([1, 2, 3, 4, 5])), vec![3, 7]);
//! ```
//!
//! A plan may end three ways. It finishes with a result (`done`), which is
//! what sequencing with [`Plan::and_then`] continues from. It stops (`stop`,
//! or an await on an exhausted channel). Or it fails (`fail`), which is
//! observed exactly like stopping. Stopping and failing hand control to the
//! nearest alternative installed with [`Plan::or`], and halt the machine when
//! there is none.

use std::{fmt, rc::Rc};

use crate::{
    machine::Machine,
    shape::{Handle, Is, Shape, Single},
    step::Step,
};

type Done<K, O, R> = Rc<dyn Fn(R) -> Machine<K, O>>;
type Fallback<K, O> = Rc<dyn Fn() -> Machine<K, O>>;

/// A plan over input shape `K` emitting `O` and finishing with `R`.
///
/// Plans are continuation-passing: running one is handed what to do with its
/// result and what to do if it stops, and produces the machine. Cloning is
/// cheap, which is what allows [`Plan::or`] to replay an alternative from its
/// start.
pub struct Plan<K: Shape, O: 'static, R: 'static> {
    run: Rc<dyn Fn(Done<K, O, R>, Fallback<K, O>) -> Machine<K, O>>,
}

impl<K: Shape, O: 'static, R: 'static> Clone for Plan<K, O, R> {
    fn clone(&self) -> Self {
        Plan {
            run: Rc::clone(&self.run),
        }
    }
}

impl<K: Shape, O: 'static, R: 'static> fmt::Debug for Plan<K, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").finish_non_exhaustive()
    }
}

/// Defer a fallback until the node that owns it is stepped.
fn lazily<K: Shape, O: 'static>(fallback: &Fallback<K, O>) -> Machine<K, O> {
    let fallback = Rc::clone(fallback);
    Machine::defer(move || fallback())
}

impl<K: Shape, O: 'static, R: 'static> Plan<K, O, R> {
    fn from_run<F>(run: F) -> Self
    where
        F: Fn(Done<K, O, R>, Fallback<K, O>) -> Machine<K, O> + 'static,
    {
        Plan { run: Rc::new(run) }
    }

    /// Run this plan, continuing with `done` on its result and with
    /// `fallback` if it stops.
    fn run_with(&self, done: Done<K, O, R>, fallback: Fallback<K, O>) -> Machine<K, O> {
        (self.run)(done, fallback)
    }

    /// Sequence: run this plan, then the plan `f` builds from its result.
    ///
    /// Running a sequence runs this plan first, so `a.then(b).then(c)...`
    /// nested to the left costs one stack frame per level before the first
    /// node is produced. Deep sequences should nest to the right
    /// (`a.then(b.then(c))`) or recurse from inside `f`, as a loop over
    /// inputs does.
    pub fn and_then<R2, F>(self, f: F) -> Plan<K, O, R2>
    where
        R2: 'static,
        F: Fn(R) -> Plan<K, O, R2> + 'static,
    {
        let f = Rc::new(f);
        Plan::from_run(move |done: Done<K, O, R2>, fallback: Fallback<K, O>| {
            let f = Rc::clone(&f);
            let stop = Rc::clone(&fallback);
            self.run_with(
                Rc::new(move |result: R| f(result).run_with(Rc::clone(&done), Rc::clone(&stop))),
                fallback,
            )
        })
    }

    /// Sequence, ignoring this plan's result. See [`Plan::and_then`] for
    /// how deep chains should nest.
    pub fn then<R2: 'static>(self, next: Plan<K, O, R2>) -> Plan<K, O, R2> {
        self.and_then(move |_| next.clone())
    }

    /// Transform the result.
    pub fn map<R2, F>(self, f: F) -> Plan<K, O, R2>
    where
        R2: Clone + 'static,
        F: Fn(R) -> R2 + 'static,
    {
        self.and_then(move |result| done(f(result)))
    }

    /// Choice: run this plan; if it stops or fails, run `other` from its start.
    ///
    /// Outputs this plan emitted before stopping are not taken back.
    ///
    /// ```rust
    /// use machina::prelude::*;
    ///
    /// // pass one input through, or say so when there is none
    /// let first: Process<&str, &str> = compile(input().and_then(emit).or(emit("empty")));
    /// assert_eq!(run(first.clone(), feed(["a", "b"])), vec!["a"]);
    /// assert_eq!(run(first, feed([])), vec!["empty"]);
    /// ```
    pub fn or(self, other: Self) -> Self {
        Plan::from_run(move |done: Done<K, O, R>, fallback: Fallback<K, O>| {
            let other = other.clone();
            let finish = Rc::clone(&done);
            let retry: Fallback<K, O> =
                Rc::new(move || other.run_with(Rc::clone(&finish), Rc::clone(&fallback)));
            self.run_with(done, retry)
        })
    }
}

/// Finish immediately with `value`.
pub fn done<K: Shape, O: 'static, R: Clone + 'static>(value: R) -> Plan<K, O, R> {
    Plan::from_run(move |done: Done<K, O, R>, _| done(value.clone()))
}

/// Emit `output`, then finish.
pub fn emit<K: Shape, O: Clone + 'static>(output: O) -> Plan<K, O, ()> {
    Plan::from_run(move |done: Done<K, O, ()>, _| {
        Machine::emit(output.clone(), Machine::defer(move || done(())))
    })
}

/// Await one value on the channel `handle` names, finishing with it.
///
/// If the channel is exhausted the plan stops.
pub fn awaits<K, O, H>(handle: H) -> Plan<K, O, H::Input>
where
    K: Shape,
    O: 'static,
    H: Handle<K>,
{
    Plan::from_run(move |done: Done<K, O, H::Input>, fallback: Fallback<K, O>| {
        Machine::new(move || {
            let done = Rc::clone(&done);
            Step::Await(handle.request(move |input| done(input)), lazily(&fallback))
        })
    })
}

/// Await one value on the only input of a process.
pub fn input<I: 'static, O: 'static>() -> Plan<Is<I>, O, I> {
    awaits(Single)
}

/// Stop this branch. The nearest [`Plan::or`] alternative takes over.
pub fn stop<K: Shape, O: 'static, R: 'static>() -> Plan<K, O, R> {
    Plan::from_run(|_, fallback: Fallback<K, O>| lazily(&fallback))
}

/// Fail this branch.
///
/// A failure carries no payload and behaves exactly like [`stop`]; it is only
/// told apart in the log.
pub fn fail<K: Shape, O: 'static, R: 'static>() -> Plan<K, O, R> {
    Plan::from_run(|_, fallback: Fallback<K, O>| {
        Machine::defer(move || {
            tracing::debug!("plan failed, taking fallback");
            fallback()
        })
    })
}

/// Compile a plan into a machine that halts when the plan finishes or stops.
pub fn compile<K: Shape, O: 'static, R: 'static>(plan: Plan<K, O, R>) -> Machine<K, O> {
    Machine::defer(move || plan.run_with(Rc::new(|_| Machine::halt()), Rc::new(Machine::halt)))
}

/// Compile a plan into a machine that starts the plan over each time it
/// finishes, and halts when it stops.
///
/// The plan must emit or await before it finishes: a plan that finishes
/// straight away has no next node, and stepping the machine never returns.
pub fn repeatedly<K: Shape, O: 'static, R: 'static>(plan: Plan<K, O, R>) -> Machine<K, O> {
    Machine::defer(move || {
        let again = plan.clone();
        plan.run_with(
            Rc::new(move |_| repeatedly(again.clone())),
            Rc::new(Machine::halt),
        )
    })
}

/// Run `plan`; once it finishes, continue as `machine`. If the plan stops,
/// halt.
pub fn before<K: Shape, O: 'static, R: 'static>(
    machine: Machine<K, O>,
    plan: Plan<K, O, R>,
) -> Machine<K, O> {
    Machine::defer(move || {
        let machine = machine.clone();
        plan.run_with(Rc::new(move |_| machine.clone()), Rc::new(Machine::halt))
    })
}
