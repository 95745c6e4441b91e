use std::rc::Rc;

use crate::{
    Machine, Process,
    build::from_sequence,
    plan::{Plan, awaits, compile, emit, input, repeatedly, stop},
    shape::{Handle, Is, Shape, Single},
};

/// Pass every value on `handle`'s channel through unchanged.
pub fn echo_on<K, H>(handle: H) -> Machine<K, H::Input>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    repeatedly(awaits(handle).and_then(emit))
}

/// The identity process: every input is emitted unchanged.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(echo(), feed([1, 2, 3])), vec![1, 2, 3]);
/// ```
pub fn echo<I: Clone + 'static>() -> Process<I, I> {
    echo_on(Single)
}

/// Apply `f` to every input.
///
/// ```rust
/// use machina::prelude::*;
///
/// let lengths = mapping(|s: &str| s.len());
/// assert_eq!(run(lengths, feed(["a", "abc"])), vec![1, 3]);
/// ```
pub fn mapping<I, O, F>(f: F) -> Process<I, O>
where
    I: 'static,
    O: Clone + 'static,
    F: Fn(I) -> O + 'static,
{
    repeatedly(input().and_then(move |value| emit(f(value))))
}

/// Emit `init`, then every running accumulation of the inputs.
///
/// ```rust
/// use machina::prelude::*;
///
/// let totals = scan(0, |acc: &u32, x: u32| acc + x);
/// assert_eq!(run(totals, feed([1, 2, 3])), vec![0, 1, 3, 6]);
/// ```
pub fn scan<I, S, F>(init: S, f: F) -> Process<I, S>
where
    I: 'static,
    S: Clone + 'static,
    F: Fn(&S, I) -> S + 'static,
{
    compile(scanning(init, Rc::new(f)))
}

fn scanning<I, S>(acc: S, f: Rc<dyn Fn(&S, I) -> S>) -> Plan<Is<I>, S, ()>
where
    I: 'static,
    S: Clone + 'static,
{
    emit(acc.clone()).then(input().and_then(move |value: I| {
        let next = f(&acc, value);
        scanning(next, Rc::clone(&f))
    }))
}

/// Accumulate all inputs and emit the result once input is exhausted.
///
/// ```rust
/// use machina::prelude::*;
///
/// let total = fold(0, |acc: &u32, x: u32| acc + x);
/// assert_eq!(run(total, feed([1, 2, 3])), vec![6]);
/// ```
pub fn fold<I, S, F>(init: S, f: F) -> Process<I, S>
where
    I: 'static,
    S: Clone + 'static,
    F: Fn(&S, I) -> S + 'static,
{
    compile(folding(init, Rc::new(f)))
}

fn folding<I, S>(acc: S, f: Rc<dyn Fn(&S, I) -> S>) -> Plan<Is<I>, S, ()>
where
    I: 'static,
    S: Clone + 'static,
{
    let partial = acc.clone();
    input()
        .or(emit(partial).then(stop()))
        .and_then(move |value: I| folding(f(&acc, value), Rc::clone(&f)))
}

/// Emit `items` first, then pass every input through.
pub fn prepended<I, It>(items: It) -> Process<I, I>
where
    I: Clone + 'static,
    It: IntoIterator<Item = I>,
{
    from_sequence(items).widen().chain(echo())
}
