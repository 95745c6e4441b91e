use crate::{
    Machine, Process,
    plan::{awaits, done, emit, repeatedly},
    shape::{Handle, Shape, Single},
};

/// Pass through the values on `handle`'s channel that satisfy `predicate`.
///
/// Works on any shape the handle addresses, for example the left input of a
/// tee.
pub fn filter_on<K, H, P>(handle: H, predicate: P) -> Machine<K, H::Input>
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
            done(())
        }
    }))
}

/// Pass through the inputs that satisfy `predicate`.
///
/// ```rust
/// use machina::prelude::*;
///
/// let odd = filter(|x: &u32| x % 2 == 1);
/// assert_eq!(run(odd, feed(1..=6)), vec![1, 3, 5]);
/// ```
pub fn filter<I, P>(predicate: P) -> Process<I, I>
where
    I: Clone + 'static,
    P: Fn(&I) -> bool + 'static,
{
    filter_on(Single, predicate)
}
