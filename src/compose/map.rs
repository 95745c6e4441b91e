//! Transforming machine outputs.

use std::rc::Rc;

use crate::{Machine, Shape, Step};

/// Transform every value `machine` emits with `f`.
///
/// Awaits keep their channel and fallback; only the emitted values change.
///
/// ```rust
/// use machina::prelude::*;
///
/// let labels = map_output(from_sequence([1, 2]), |n: u8| format!("#{n}"));
/// assert_eq!(run(labels, no_input()), vec!["#1", "#2"]);
/// ```
pub fn map_output<K, O, P, F>(machine: Machine<K, O>, f: F) -> Machine<K, P>
where
    K: Shape,
    O: 'static,
    P: 'static,
    F: Fn(O) -> P + 'static,
{
    mapped(machine, Rc::new(f))
}

fn mapped<K, O, P>(machine: Machine<K, O>, f: Rc<dyn Fn(O) -> P>) -> Machine<K, P>
where
    K: Shape,
    O: 'static,
    P: 'static,
{
    Machine::new(move || match machine.step() {
        Step::Emit(output, next) => Step::Emit(f(output), mapped(next, Rc::clone(&f))),
        Step::Await(request, fallback) => {
            let resumed = Rc::clone(&f);
            Step::Await(
                K::map_request(request, move |next: Machine<K, O>| {
                    mapped(next, Rc::clone(&resumed))
                }),
                mapped(fallback, Rc::clone(&f)),
            )
        }
        Step::Halt => Step::Halt,
    })
}
