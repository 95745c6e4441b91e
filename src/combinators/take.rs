use std::rc::Rc;

use crate::{
    Machine, Process,
    combinators::echo_on,
    plan::{Plan, awaits, before, compile, done, emit, repeatedly, stop},
    shape::{Handle, Shape, Single},
};

/// Emit the first `n` values on `handle`'s channel, then halt.
pub fn take_first_on<K, H>(handle: H, n: usize) -> Machine<K, H::Input>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    compile(taking(handle, n))
}

fn taking<K, H>(handle: H, n: usize) -> Plan<K, H::Input, ()>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    if n == 0 {
        return done(());
    }
    awaits(handle)
        .and_then(emit)
        .and_then(move |_| taking(handle, n - 1))
}

/// Emit the first `n` inputs, then halt without asking for more.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(take_first(2), feed([7, 8, 9])), vec![7, 8]);
/// ```
pub fn take_first<I: Clone + 'static>(n: usize) -> Process<I, I> {
    take_first_on(Single, n)
}

/// Discard the first `n` values on `handle`'s channel, then pass the rest through.
pub fn drop_first_on<K, H>(handle: H, n: usize) -> Machine<K, H::Input>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    before(echo_on(handle), dropping(handle, n))
}

fn dropping<K, H>(handle: H, n: usize) -> Plan<K, H::Input, ()>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    if n == 0 {
        return done(());
    }
    awaits(handle).and_then(move |_| dropping(handle, n - 1))
}

/// Discard the first `n` inputs, then pass the rest through.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(drop_first(2), feed([7, 8, 9])), vec![9]);
/// ```
pub fn drop_first<I: Clone + 'static>(n: usize) -> Process<I, I> {
    drop_first_on(Single, n)
}

/// Pass values through while `predicate` holds; halt at the first value that
/// fails it. That value is consumed but not emitted.
pub fn take_while_on<K, H, P>(handle: H, predicate: P) -> Machine<K, H::Input>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
    P: Fn(&H::Input) -> bool + 'static,
{
    repeatedly(awaits(handle).and_then(move |value| {
        if predicate(&value) {
            emit(value)
        } else {
            stop()
        }
    }))
}

/// Pass inputs through while `predicate` holds.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(take_while(|x: &u32| *x < 5), feed([1, 3, 5, 2, 9])), vec![1, 3]);
/// ```
pub fn take_while<I, P>(predicate: P) -> Process<I, I>
where
    I: Clone + 'static,
    P: Fn(&I) -> bool + 'static,
{
    take_while_on(Single, predicate)
}

/// Discard values while `predicate` holds; emit the first value that fails
/// it, then pass everything through.
pub fn drop_while_on<K, H, P>(handle: H, predicate: P) -> Machine<K, H::Input>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
    P: Fn(&H::Input) -> bool + 'static,
{
    before(echo_on(handle), dropping_while(handle, Rc::new(predicate)))
}

fn dropping_while<K, H>(
    handle: H,
    predicate: Rc<dyn Fn(&H::Input) -> bool>,
) -> Plan<K, H::Input, ()>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    awaits(handle).and_then(move |value| {
        if predicate(&value) {
            dropping_while(handle, Rc::clone(&predicate))
        } else {
            emit(value)
        }
    })
}

/// Discard inputs while `predicate` holds, then pass everything through.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(drop_while(|x: &u32| *x < 5), feed([1, 3, 5, 2, 9])), vec![5, 2, 9]);
/// ```
pub fn drop_while<I, P>(predicate: P) -> Process<I, I>
where
    I: Clone + 'static,
    P: Fn(&I) -> bool + 'static,
{
    drop_while_on(Single, predicate)
}
