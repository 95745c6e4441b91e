use std::convert::Infallible;

use crate::{
    Machine, Process, Source, Step, Tee,
    combinators::echo,
    shape::TeeRequest,
};

/// Precompose `left` and `right` onto the two inputs of `body`.
///
/// Only the side `body` is currently awaiting is ever stepped. A value that
/// side emits is handed to `body`; if it halts, `body` continues with the
/// fallback of its await; if it needs input, the tee awaits on that same
/// external channel. The other side is left exactly as it was.
///
/// ```rust
/// use machina::prelude::*;
///
/// let body = zip_with(|a: u32, b: u32| a * b);
/// let products = tee(filter(|a: &u32| a % 2 == 1), mapping(|b: u32| b + 1), body);
/// assert_eq!(run(products, feed_both([1, 2, 3], [10, 20])), vec![11, 63]);
/// ```
pub fn tee<A, A2, B, B2, C>(
    left: Process<A, A2>,
    right: Process<B, B2>,
    body: Tee<A2, B2, C>,
) -> Tee<A, B, C>
where
    A: 'static,
    A2: 'static,
    B: 'static,
    B2: 'static,
    C: 'static,
{
    Machine::new(move || {
        let mut left = left.clone();
        let mut right = right.clone();
        let mut body = body.clone();
        loop {
            match body.step() {
                Step::Halt => return Step::Halt,
                Step::Emit(output, next) => return Step::Emit(output, tee(left, right, next)),
                Step::Await(TeeRequest::Left(resume), fallback) => match left.step() {
                    Step::Emit(value, next) => {
                        left = next;
                        body = resume.resume(value);
                    }
                    Step::Halt => {
                        left = Machine::halt();
                        body = fallback;
                    }
                    Step::Await(request, left_fallback) => {
                        let (waiting_right, waiting_body) = (right.clone(), body.clone());
                        return Step::Await(
                            TeeRequest::Left(request.map(move |resumed| {
                                tee(resumed, waiting_right.clone(), waiting_body.clone())
                            })),
                            tee(left_fallback, right, body),
                        );
                    }
                },
                Step::Await(TeeRequest::Right(resume), fallback) => match right.step() {
                    Step::Emit(value, next) => {
                        right = next;
                        body = resume.resume(value);
                    }
                    Step::Halt => {
                        right = Machine::halt();
                        body = fallback;
                    }
                    Step::Await(request, right_fallback) => {
                        let (waiting_left, waiting_body) = (left.clone(), body.clone());
                        return Step::Await(
                            TeeRequest::Right(request.map(move |resumed| {
                                tee(waiting_left.clone(), resumed, waiting_body.clone())
                            })),
                            tee(left, right_fallback, body),
                        );
                    }
                },
            }
        }
    })
}

/// Precompose `process` onto the left input of `body`.
pub fn add_left<A, A2, B, C>(process: Process<A, A2>, body: Tee<A2, B, C>) -> Tee<A, B, C>
where
    A: 'static,
    A2: 'static,
    B: Clone + 'static,
    C: 'static,
{
    tee(process, echo(), body)
}

/// Precompose `process` onto the right input of `body`.
pub fn add_right<A, B, B2, C>(process: Process<B, B2>, body: Tee<A, B2, C>) -> Tee<A, B, C>
where
    A: Clone + 'static,
    B: 'static,
    B2: 'static,
    C: 'static,
{
    tee(echo(), process, body)
}

/// Feed the left input of `body` from `source`, leaving a process over the
/// right input.
///
/// ```rust
/// use machina::prelude::*;
///
/// let labelled = cap_left(cycle_sequence(["x", "y"]), zipping::<&str, u32>());
/// assert_eq!(run(labelled, feed([1, 2, 3])), vec![("x", 1), ("y", 2), ("x", 3)]);
/// ```
pub fn cap_left<A, B, C>(source: Source<A>, body: Tee<A, B, C>) -> Process<B, C>
where
    A: 'static,
    B: Clone + 'static,
    C: 'static,
{
    only_right(tee(source.widen(), echo(), body))
}

/// Feed the right input of `body` from `source`, leaving a process over the
/// left input.
pub fn cap_right<A, B, C>(source: Source<B>, body: Tee<A, B, C>) -> Process<A, C>
where
    A: Clone + 'static,
    B: 'static,
    C: 'static,
{
    only_left(tee(echo(), source.widen(), body))
}

/// Collapse a tee whose left input can never be answered onto its right input.
///
/// A left await on an uninhabited channel is already exhausted, so it takes
/// its fallback.
fn only_right<B: 'static, C: 'static>(machine: Tee<Infallible, B, C>) -> Process<B, C> {
    Machine::new(move || {
        let mut machine = machine.clone();
        loop {
            match machine.step() {
                Step::Halt => return Step::Halt,
                Step::Emit(output, next) => return Step::Emit(output, only_right(next)),
                Step::Await(TeeRequest::Right(resume), fallback) => {
                    return Step::Await(resume.map(only_right), only_right(fallback));
                }
                Step::Await(TeeRequest::Left(_), fallback) => machine = fallback,
            }
        }
    })
}

fn only_left<A: 'static, C: 'static>(machine: Tee<A, Infallible, C>) -> Process<A, C> {
    Machine::new(move || {
        let mut machine = machine.clone();
        loop {
            match machine.step() {
                Step::Halt => return Step::Halt,
                Step::Emit(output, next) => return Step::Emit(output, only_left(next)),
                Step::Await(TeeRequest::Left(resume), fallback) => {
                    return Step::Await(resume.map(only_left), only_left(fallback));
                }
                Step::Await(TeeRequest::Right(_), fallback) => machine = fallback,
            }
        }
    })
}
