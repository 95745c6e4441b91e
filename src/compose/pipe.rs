use crate::{Machine, Process, Shape, Step};

/// Feed the outputs of `upstream` into `downstream`.
///
/// Evaluation is driven by `downstream`: `upstream` is only stepped while
/// `downstream` is waiting for a value, and is dropped as soon as
/// `downstream` halts. When `upstream` halts, `downstream` continues with
/// the fallback of the await it is blocked on. When `upstream` itself needs
/// input, the composed machine awaits on upstream's channel.
///
/// Composition is associative and [`echo`](crate::echo) is its identity.
///
/// ```rust
/// use machina::prelude::*;
///
/// let pipeline = compose(filter(|x: &u32| x % 2 == 0), buffer(2));
/// assert_eq!(run(pipeline, feed(1..=7)), vec![vec![2, 4], vec![6]]);
/// ```
pub fn compose<K, B, C>(upstream: Machine<K, B>, downstream: Process<B, C>) -> Machine<K, C>
where
    K: Shape,
    B: 'static,
    C: 'static,
{
    Machine::new(move || {
        let mut up = upstream.clone();
        let mut down = downstream.clone();
        loop {
            match down.step() {
                Step::Halt => return Step::Halt,
                Step::Emit(output, next) => return Step::Emit(output, compose(up, next)),
                Step::Await(resume, fallback) => match up.step() {
                    Step::Emit(value, next) => {
                        up = next;
                        down = resume.resume(value);
                    }
                    Step::Halt => {
                        up = Machine::halt();
                        down = fallback;
                    }
                    Step::Await(request, up_fallback) => {
                        let waiting = down.clone();
                        return Step::Await(
                            K::map_request(request, move |resumed: Machine<K, B>| {
                                compose(resumed, waiting.clone())
                            }),
                            compose(up_fallback, down),
                        );
                    }
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Source,
        build::from_sequence,
        combinators::{buffer, echo, filter, mapping, take_first, take_while, zipping},
        handler::{feed, feed_both, no_input, run},
        shape::Channel,
    };
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_downstream_halt_discards_upstream() {
        let machine: Process<u8, u8> = compose(echo(), Machine::halt());
        assert!(machine.step().is_halt());
    }

    #[test]
    fn test_downstream_emit_passes_through() {
        let downstream: Process<u8, u8> = from_sequence([4, 5]).widen();
        let machine: Process<u8, u8> = compose(echo(), downstream);
        assert_eq!(run(machine, feed(Vec::new())), vec![4, 5]);
    }

    #[test]
    fn test_upstream_emit_feeds_downstream() {
        let machine = compose(from_sequence([1_u8, 2, 3]), mapping(|x: u8| x * 2));
        assert_eq!(run(machine, no_input()), vec![2, 4, 6]);
    }

    #[test]
    fn test_upstream_halt_takes_downstream_fallback() {
        let downstream: Process<u8, u8> = echo().chain(from_sequence([42]).widen());
        let machine = compose(from_sequence([1_u8]), downstream);
        assert_eq!(run(machine, no_input()), vec![1, 42]);
    }

    #[test]
    fn test_upstream_await_surfaces_upstream_channel() {
        let machine: Process<u8, u8> = compose(echo(), echo());
        assert_eq!(machine.step().channel(), Some(Channel::Single));

        let zipped = compose(
            zipping::<u8, char>(),
            mapping(|(n, c): (u8, char)| format!("{n}{c}")),
        );
        assert_eq!(zipped.step().channel(), Some(Channel::Left));
        assert_eq!(
            run(zipped, feed_both([1, 2], ['a', 'b'])),
            vec!["1a".to_owned(), "2b".to_owned()]
        );
    }

    #[test]
    fn test_end_to_end_filter_then_buffer() {
        let pipeline: Process<u32, Vec<u32>> = filter(|x: &u32| x % 2 == 0).pipe(buffer(2));
        assert_eq!(run(pipeline, feed([1, 2, 3, 4, 5, 6, 7])), vec![vec![2, 4], vec![6]]);
    }

    #[test]
    fn test_upstream_not_pulled_after_downstream_halts() {
        let pulled = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&pulled);
        let spy: Process<u32, u32> = mapping(move |x: u32| {
            log.borrow_mut().push(x);
            x
        });
        let machine = spy.pipe(take_while(|x: &u32| *x < 5));
        assert_eq!(run(machine, feed([1, 3, 5, 2, 9])), vec![1, 3]);
        assert_eq!(&*pulled.borrow(), &[1, 3, 5]);
    }

    #[test]
    fn test_long_runs_without_output_do_not_grow_the_stack() {
        let machine: Source<u32> =
            from_sequence(0..200_000_u32).pipe(filter(|x: &u32| *x == 199_999));
        assert_eq!(run(machine, no_input()), vec![199_999]);
    }

    #[test]
    fn test_take_after_infinite_upstream() {
        let machine = compose(crate::build::repeated(3_u8), take_first(3));
        assert_eq!(run(machine, no_input()), vec![3, 3, 3]);
    }
}
