use std::{fmt, rc::Rc};

use crate::{
    Process,
    plan::{Plan, compile, emit, input},
    shape::Is,
};

/// A Moore machine: a current output, and the machine to become on each input.
pub struct Moore<A, B> {
    output: B,
    next: Rc<dyn Fn(A) -> Moore<A, B>>,
}

impl<A: 'static, B: 'static> Moore<A, B> {
    pub fn new<F>(output: B, next: F) -> Self
    where
        F: Fn(A) -> Moore<A, B> + 'static,
    {
        Moore {
            output,
            next: Rc::new(next),
        }
    }

    /// A Moore machine over an explicit state: `output` reads the state and
    /// `transition` advances it.
    ///
    /// ```rust
    /// use machina::prelude::*;
    ///
    /// let parity = Moore::unfold(0_u32, |ones| ones % 2 == 1, |ones, bit: u8| {
    ///     ones + u32::from(bit)
    /// });
    /// let outputs = run(auto_moore(parity), feed([1, 1, 0, 1]));
    /// assert_eq!(outputs, vec![false, true, false, false, true]);
    /// ```
    pub fn unfold<S, Out, Next>(state: S, output: Out, transition: Next) -> Self
    where
        S: 'static,
        Out: Fn(&S) -> B + 'static,
        Next: Fn(&S, A) -> S + 'static,
    {
        unfolding(state, Rc::new(output), Rc::new(transition))
    }

    pub fn output(&self) -> &B {
        &self.output
    }

    /// The machine after consuming `input`.
    pub fn next(&self, input: A) -> Moore<A, B> {
        (self.next)(input)
    }
}

fn unfolding<A, B, S>(
    state: S,
    output: Rc<dyn Fn(&S) -> B>,
    transition: Rc<dyn Fn(&S, A) -> S>,
) -> Moore<A, B>
where
    A: 'static,
    B: 'static,
    S: 'static,
{
    Moore {
        output: output(&state),
        next: Rc::new(move |input| {
            unfolding(
                transition(&state, input),
                Rc::clone(&output),
                Rc::clone(&transition),
            )
        }),
    }
}

impl<A, B: Clone> Clone for Moore<A, B> {
    fn clone(&self) -> Self {
        Moore {
            output: self.output.clone(),
            next: Rc::clone(&self.next),
        }
    }
}

impl<A, B: fmt::Debug> fmt::Debug for Moore<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Moore")
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// Run a Moore machine as a process: emit its output, await an input,
/// advance, and repeat. Emits one more value than it consumes.
pub fn auto_moore<A, B>(moore: Moore<A, B>) -> Process<A, B>
where
    A: 'static,
    B: Clone + 'static,
{
    compile(moore_plan(moore))
}

fn moore_plan<A, B>(moore: Moore<A, B>) -> Plan<Is<A>, B, ()>
where
    A: 'static,
    B: Clone + 'static,
{
    let output = moore.output.clone();
    emit(output).then(input().and_then(move |value: A| moore_plan(moore.next(value))))
}

/// A Mealy machine: on each input, an output and the machine to become.
pub struct Mealy<A, B> {
    step: Rc<dyn Fn(A) -> (B, Mealy<A, B>)>,
}

impl<A: 'static, B: 'static> Mealy<A, B> {
    pub fn new<F>(step: F) -> Self
    where
        F: Fn(A) -> (B, Mealy<A, B>) + 'static,
    {
        Mealy { step: Rc::new(step) }
    }

    /// A stateless Mealy machine applying `f` to every input.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(A) -> B + 'static,
    {
        Mealy::unfold((), move |_, input| (f(input), ()))
    }

    /// A Mealy machine over an explicit state.
    ///
    /// ```rust
    /// use machina::prelude::*;
    ///
    /// // difference from the previous input
    /// let delta = Mealy::unfold(0_i32, |prev, x: i32| (x - prev, x));
    /// assert_eq!(run(auto_mealy(delta), feed([3, 5, 4])), vec![3, 2, -1]);
    /// ```
    pub fn unfold<S, F>(state: S, f: F) -> Self
    where
        S: 'static,
        F: Fn(&S, A) -> (B, S) + 'static,
    {
        mealy_unfolding(state, Rc::new(f))
    }

    /// Consume `input`, returning the output and the machine to continue with.
    pub fn feed(&self, input: A) -> (B, Mealy<A, B>) {
        (self.step)(input)
    }
}

fn mealy_unfolding<A, B, S>(state: S, f: Rc<dyn Fn(&S, A) -> (B, S)>) -> Mealy<A, B>
where
    A: 'static,
    B: 'static,
    S: 'static,
{
    Mealy::new(move |input| {
        let (output, next) = f(&state, input);
        (output, mealy_unfolding(next, Rc::clone(&f)))
    })
}

impl<A, B> Clone for Mealy<A, B> {
    fn clone(&self) -> Self {
        Mealy {
            step: Rc::clone(&self.step),
        }
    }
}

impl<A, B> fmt::Debug for Mealy<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mealy").finish_non_exhaustive()
    }
}

/// Run a Mealy machine as a process: one output per input.
pub fn auto_mealy<A, B>(mealy: Mealy<A, B>) -> Process<A, B>
where
    A: 'static,
    B: Clone + 'static,
{
    compile(mealy_plan(mealy))
}

fn mealy_plan<A, B>(mealy: Mealy<A, B>) -> Plan<Is<A>, B, ()>
where
    A: 'static,
    B: Clone + 'static,
{
    input().and_then(move |value: A| {
        let (output, next) = mealy.feed(value);
        emit(output).then(mealy_plan(next))
    })
}
