//! Bodies for two-input machines.

use std::rc::Rc;

use either::Either;

use crate::{
    Tee,
    plan::{Plan, awaits, emit, repeatedly, stop},
    shape::{Handle, Left, Right, T},
};

/// Await left, then right, and emit `f` of the pair. Halts as soon as
/// either side is exhausted.
///
/// ```rust
/// use machina::prelude::*;
///
/// let sums = zip_with(|a: u32, b: u32| a + b);
/// assert_eq!(run(sums, feed_both([1, 2, 3], [10, 20])), vec![11, 22]);
/// ```
pub fn zip_with<A, B, C, F>(f: F) -> Tee<A, B, C>
where
    A: Clone + 'static,
    B: 'static,
    C: Clone + 'static,
    F: Fn(A, B) -> C + 'static,
{
    let f = Rc::new(f);
    repeatedly(awaits(Left).and_then(move |a: A| {
        let f = Rc::clone(&f);
        awaits(Right).and_then(move |b: B| emit(f(a.clone(), b)))
    }))
}

/// Pair up left and right inputs.
pub fn zipping<A, B>() -> Tee<A, B, (A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    zip_with(|a, b| (a, b))
}

/// Take from left and right in turn, tagging each value with its side.
///
/// Once one side is exhausted the other is drained to its end.
///
/// ```rust
/// use machina::prelude::*;
/// use either::Either;
///
/// let merged = alternate::<u8, char>();
/// assert_eq!(
///     run(merged, feed_both([1, 2, 3], ['a'])),
///     vec![Either::Left(1), Either::Right('a'), Either::Left(2), Either::Left(3)],
/// );
/// ```
pub fn alternate<A, B>() -> Tee<A, B, Either<A, B>>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    repeatedly(
        awaits(Left)
            .or(draining(Right).then(stop()))
            .and_then(|a| emit(Either::Left(a)))
            .then(
                awaits(Right)
                    .or(draining(Left).then(stop()))
                    .and_then(|b| emit(Either::Right(b))),
            ),
    )
}

/// Emit everything from one side, finishing when it is exhausted.
fn draining<A, B, H>(handle: H) -> Plan<T<A, B>, Either<A, B>, ()>
where
    A: Clone + 'static,
    B: Clone + 'static,
    H: Tagged<A, B>,
{
    awaits(handle)
        .and_then(move |value| emit(H::tag(value)))
        .and_then(move |_| draining(handle))
}

/// A tee handle that knows which side of an `Either` its values belong on.
trait Tagged<A: 'static, B: 'static>: Handle<T<A, B>> {
    fn tag(value: Self::Input) -> Either<A, B>;
}

impl<A: 'static, B: 'static> Tagged<A, B> for Left {
    fn tag(value: A) -> Either<A, B> {
        Either::Left(value)
    }
}

impl<A: 'static, B: 'static> Tagged<A, B> for Right {
    fn tag(value: B) -> Either<A, B> {
        Either::Right(value)
    }
}
