use std::rc::Rc;

use crate::{Machine, Process, Source, Step, compose::compose};

/// Emit `items` in order, then halt.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(from_sequence(["a", "b"]), no_input()), vec!["a", "b"]);
/// ```
pub fn from_sequence<O: Clone + 'static>(items: impl IntoIterator<Item = O>) -> Source<O> {
    let items: Rc<[O]> = items.into_iter().collect();
    emitting(items, 0)
}

fn emitting<O: Clone + 'static>(items: Rc<[O]>, index: usize) -> Source<O> {
    Machine::new(move || match items.get(index) {
        Some(item) => Step::Emit(item.clone(), emitting(Rc::clone(&items), index + 1)),
        None => Step::Halt,
    })
}

/// Emit `items` in order, starting over at the end, forever.
///
/// An empty sequence halts immediately.
///
/// ```rust
/// use machina::prelude::*;
///
/// let letters = cycle_sequence(['a', 'b']).pipe(take_first(5));
/// assert_eq!(run(letters, no_input()), vec!['a', 'b', 'a', 'b', 'a']);
/// ```
pub fn cycle_sequence<O: Clone + 'static>(items: impl IntoIterator<Item = O>) -> Source<O> {
    let items: Rc<[O]> = items.into_iter().collect();
    if items.is_empty() {
        return Machine::halt();
    }
    cycling(items, 0)
}

fn cycling<O: Clone + 'static>(items: Rc<[O]>, index: usize) -> Source<O> {
    Machine::new(move || {
        let next = (index + 1) % items.len();
        Step::Emit(items[index].clone(), cycling(Rc::clone(&items), next))
    })
}

/// Emit `value` forever.
pub fn repeated<O: Clone + 'static>(value: O) -> Source<O> {
    Machine::new(move || Step::Emit(value.clone(), repeated(value.clone())))
}

/// Emit the values `f` produces from a running state, halting once it
/// returns `None`.
///
/// ```rust
/// use machina::prelude::*;
///
/// let powers = unfold(1_u32, |n| (n <= 100).then(|| (n, n * 3)));
/// assert_eq!(run(powers, no_input()), vec![1, 3, 9, 27, 81]);
/// ```
pub fn unfold<S, O, F>(seed: S, f: F) -> Source<O>
where
    S: Clone + 'static,
    O: 'static,
    F: Fn(S) -> Option<(O, S)> + 'static,
{
    unfolding(seed, Rc::new(f))
}

fn unfolding<S, O>(state: S, f: Rc<dyn Fn(S) -> Option<(O, S)>>) -> Source<O>
where
    S: Clone + 'static,
    O: 'static,
{
    Machine::new(move || match f(state.clone()) {
        Some((output, next)) => Step::Emit(output, unfolding(next, Rc::clone(&f))),
        None => Step::Halt,
    })
}

/// The source that emits nothing.
pub fn stopped<O: 'static>() -> Source<O> {
    Machine::halt()
}

/// Answer every await of `process` from `inputs`, leaving a source.
///
/// Once `inputs` is used up the process sees its channel as exhausted.
///
/// ```rust
/// use machina::prelude::*;
///
/// let chunks = drive_with(1..=5, buffer(2));
/// assert_eq!(run(chunks, no_input()), vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn drive_with<I, O>(inputs: impl IntoIterator<Item = I>, process: Process<I, O>) -> Source<O>
where
    I: Clone + 'static,
    O: 'static,
{
    compose(from_sequence(inputs), process)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        combinators::{mapping, take_first},
        handler::{no_input, run},
    };

    #[test]
    fn test_from_sequence_empty_halts() {
        let machine: Source<u8> = from_sequence([]);
        assert!(machine.step().is_halt());
    }

    #[test]
    fn test_from_sequence_replays() {
        let machine = from_sequence(vec![1, 2, 3]);
        assert_eq!(run(machine.clone(), no_input()), vec![1, 2, 3]);
        assert_eq!(run(machine, no_input()), vec![1, 2, 3]);
    }

    #[test]
    fn test_cycle_sequence_empty_halts() {
        let machine: Source<u8> = cycle_sequence(Vec::new());
        assert!(machine.step().is_halt());
    }

    #[test]
    fn test_cycle_sequence_wraps_around() {
        let machine = cycle_sequence([1, 2, 3]).pipe(take_first(7));
        assert_eq!(run(machine, no_input()), vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_repeated_is_infinite() {
        let machine = repeated("x").pipe(take_first(3));
        assert_eq!(run(machine, no_input()), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_unfold_fibonacci() {
        let fib = unfold((0_u64, 1_u64), |(a, b)| Some((a, (b, a + b))));
        assert_eq!(run(fib.pipe(take_first(8)), no_input()), vec![0, 1, 1, 2, 3, 5, 8, 13]);
    }

    #[test]
    fn test_stopped_emits_nothing() {
        assert!(run(stopped::<u8>(), no_input()).is_empty());
    }

    #[test]
    fn test_drive_with_exhausts_process() {
        let doubled = drive_with([1, 2, 3], mapping(|x: u32| x * 2));
        assert_eq!(run(doubled, no_input()), vec![2, 4, 6]);
    }
}
