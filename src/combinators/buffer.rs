use crate::{
    Machine, Process,
    plan::{Plan, awaits, emit, repeatedly, stop},
    shape::{Handle, Shape, Single},
};

/// Group the values on `handle`'s channel into chunks of `size`.
///
/// A full chunk is emitted as soon as its last value arrives. When the
/// channel is exhausted part way through a chunk, the partial chunk is
/// emitted before halting; an empty chunk never is. A `size` of zero is
/// treated as one.
pub fn buffer_on<K, H>(handle: H, size: usize) -> Machine<K, Vec<H::Input>>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    repeatedly(chunk(handle, size.max(1), Vec::new()))
}

fn chunk<K, H>(handle: H, size: usize, acc: Vec<H::Input>) -> Plan<K, Vec<H::Input>, ()>
where
    K: Shape,
    H: Handle<K>,
    H::Input: Clone,
{
    if acc.len() >= size {
        return emit(acc);
    }
    let flush = if acc.is_empty() {
        stop()
    } else {
        emit(acc.clone()).then(stop())
    };
    awaits(handle).or(flush).and_then(move |value| {
        let mut acc = acc.clone();
        acc.push(value);
        chunk(handle, size, acc)
    })
}

/// Group inputs into chunks of `size`, emitting a final partial chunk if
/// input runs out.
///
/// ```rust
/// use machina::prelude::*;
///
/// let chunks = buffer(3);
/// assert_eq!(run(chunks, feed(1..=7)), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
/// ```
pub fn buffer<I: Clone + 'static>(size: usize) -> Process<I, Vec<I>> {
    buffer_on(Single, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Tee,
        handler::{feed, feed_both, run},
        shape::Right,
    };

    #[test]
    fn test_buffer_exact_multiple() {
        assert_eq!(run(buffer(2), feed([1, 2, 3, 4])), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_buffer_empty_input_emits_nothing() {
        assert_eq!(run(buffer::<u8>(4), feed([])), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn test_buffer_zero_behaves_as_one() {
        assert_eq!(run(buffer(0), feed(['a', 'b'])), vec![vec!['a'], vec!['b']]);
    }

    #[test]
    fn test_buffer_emits_full_chunk_without_waiting_for_more() {
        let machine: Process<u8, Vec<u8>> = buffer(2);
        let (request, _) = machine.step().unwrap_await();
        let (request, _) = request.resume(1).step().unwrap_await();
        let (chunk, _) = request.resume(2).step().unwrap_emit();
        assert_eq!(chunk, vec![1, 2]);
    }

    #[test]
    fn test_buffer_on_right_side() {
        let machine: Tee<u8, u8, Vec<u8>> = buffer_on(Right, 2);
        assert_eq!(run(machine, feed_both([], [1, 2, 3])), vec![vec![1, 2], vec![3]]);
    }
}
