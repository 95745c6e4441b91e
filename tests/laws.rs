use machina::prelude::*;
use proptest::prelude::*;

fn small_inputs() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-50..50_i32, 0..40)
}

proptest! {
    #[test]
    fn echo_is_left_identity(inputs in small_inputs()) {
        let process = mapping(|x: i32| x * 3);
        let piped = echo().pipe(process.clone());
        prop_assert_eq!(run(piped, feed(inputs.clone())), run(process, feed(inputs)));
    }

    #[test]
    fn echo_is_right_identity(inputs in small_inputs()) {
        let process = filter(|x: &i32| *x > 0);
        let piped = process.clone().pipe(echo());
        prop_assert_eq!(run(piped, feed(inputs.clone())), run(process, feed(inputs)));
    }

    #[test]
    fn compose_is_associative(inputs in small_inputs(), n in 0..10_usize, size in 1..5_usize) {
        let a = || filter(|x: &i32| x % 3 != 0);
        let b = move || take_first::<i32>(n);
        let c = move || buffer::<i32>(size);
        let left = compose(compose(a(), b()), c());
        let right = compose(a(), compose(b(), c()));
        prop_assert_eq!(run(left, feed(inputs.clone())), run(right, feed(inputs)));
    }

    #[test]
    fn take_then_drop_is_the_whole_input(inputs in small_inputs(), n in 0..50_usize) {
        let mut joined = run(take_first(n), feed(inputs.clone()));
        joined.extend(run(drop_first(n), feed(inputs.clone())));
        prop_assert_eq!(joined, inputs);
    }

    #[test]
    fn take_while_and_drop_while_split_the_input(inputs in small_inputs(), bound in -50..50_i32) {
        let mut joined = run(take_while(move |x: &i32| *x < bound), feed(inputs.clone()));
        let rest = run(drop_while(move |x: &i32| *x < bound), feed(inputs.clone()));
        joined.extend(rest);
        prop_assert_eq!(joined, inputs);
    }

    #[test]
    fn buffer_round_trips(inputs in small_inputs(), size in 1..8_usize) {
        let chunks = run(buffer(size), feed(inputs.clone()));
        prop_assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= size));
        if let Some((last, full)) = chunks.split_last() {
            prop_assert!(full.iter().all(|chunk| chunk.len() == size));
            prop_assert!(last.len() <= size);
        }
        prop_assert_eq!(chunks.concat(), inputs);
    }

    #[test]
    fn filter_is_idempotent(inputs in small_inputs()) {
        let even = || filter(|x: &i32| x % 2 == 0);
        let once = run(even(), feed(inputs.clone()));
        let twice = run(even().pipe(even()), feed(inputs));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn capped_merge_depends_only_on_its_input(inputs in small_inputs()) {
        let body = zip_with(|a: i32, b: i32| a + b);
        let capped = cap_right(repeated(0), tee(echo(), echo(), body));
        prop_assert_eq!(run(capped, feed(inputs.clone())), inputs);
    }

    #[test]
    fn drive_with_matches_feed(inputs in small_inputs()) {
        let process = || scan(0, |acc: &i32, x: i32| acc + x);
        let driven = drive_with(inputs.clone(), process());
        prop_assert_eq!(run(driven, no_input()), run(process(), feed(inputs)));
    }

    #[test]
    fn stepping_is_repeatable(inputs in small_inputs()) {
        let machine = filter(|x: &i32| *x != 0).pipe(buffer(3));
        prop_assert_eq!(run(machine.clone(), feed(inputs.clone())), run(machine, feed(inputs)));
    }
}

#[test]
fn filter_then_buffer() {
    let pipeline = filter(|x: &u32| x % 2 == 0).pipe(buffer(2));
    assert_eq!(run(pipeline, feed(1..=7)), vec![vec![2, 4], vec![6]]);
}

#[test]
fn take_while_leaves_the_rest_unread() {
    let mut inputs = [1, 3, 5, 2, 9].into_iter();
    let outputs = run(take_while(|x: &u32| *x < 5), feed(inputs.by_ref()));
    assert_eq!(outputs, vec![1, 3]);
    assert_eq!(inputs.collect::<Vec<_>>(), vec![2, 9]);
}

#[test]
fn merge_steps_only_the_awaited_side() {
    let body = compile(awaits(Right).and_then(|b: char| emit(b.to_string())));
    let merged = tee(mapping(|a: u8| a + 1), echo(), body);
    assert_eq!(run(merged, feed_both([1, 2], ['q'])), vec!["q".to_owned()]);
}

#[test]
fn automata_as_processes() {
    let running = Moore::unfold(0_u32, |s| *s, |s, x: u32| s + x);
    assert_eq!(run(auto_moore(running), feed([1, 2])), vec![0, 1, 3]);

    let pairs = Mealy::unfold(None, |prev: &Option<u8>, x: u8| (prev.map(|p| (p, x)), Some(x)));
    assert_eq!(
        run(auto_mealy(pairs), feed([1, 2, 3])),
        vec![None, Some((1, 2)), Some((2, 3))]
    );
}
