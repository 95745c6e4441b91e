//! Functions for driving machines with external input.
//!
//! A machine never reads input by itself: each await node is answered by a
//! [`Provider`], which either resumes it with a value or reports the channel
//! as exhausted. [`drive`] turns a machine and a provider into an iterator of
//! outputs; [`run`] collects them. [`run_async`] answers awaits with futures.
//!
//! ```rust
//! use machina::prelude::*;
//!
//! let evens = filter(|x: &u32| x % 2 == 0);
//! let mut outputs = drive(evens, feed([1, 2, 3, 4]));
//! assert_eq!(outputs.next(), Some(2));
//! assert_eq!(outputs.next(), Some(4));
//! assert_eq!(outputs.next(), None);
//! ```

use std::{fmt, future::Future, iter::Fuse};

use crate::{
    config::DriveConfig,
    error::{BoxError, DriveError},
    machine::{Machine, Process},
    shape::{Is, Resume, Shape, T, TeeRequest},
    step::Step,
};

/// Answers the await requests of machines of shape `K`.
pub trait Provider<K: Shape> {
    /// Resume `request` with the next value on its channel, or return `None`
    /// if that channel is exhausted.
    fn provide<M: 'static>(&mut self, request: K::Request<M>) -> Option<M>;

    /// Take the error that ended input early, if there was one.
    fn take_error(&mut self) -> Option<BoxError> {
        None
    }
}

impl<K: Shape, P: Provider<K> + ?Sized> Provider<K> for &mut P {
    fn provide<M: 'static>(&mut self, request: K::Request<M>) -> Option<M> {
        (**self).provide(request)
    }

    fn take_error(&mut self) -> Option<BoxError> {
        (**self).take_error()
    }
}

/// Provider answering a process from an iterator.
#[derive(Debug, Clone)]
pub struct Feed<It> {
    inputs: Fuse<It>,
}

/// Answer every await of a process with the next item of `inputs`.
pub fn feed<It: IntoIterator>(inputs: It) -> Feed<It::IntoIter> {
    Feed {
        inputs: inputs.into_iter().fuse(),
    }
}

impl<It> Provider<Is<It::Item>> for Feed<It>
where
    It: Iterator,
    It::Item: 'static,
{
    fn provide<M: 'static>(&mut self, request: Resume<It::Item, M>) -> Option<M> {
        self.inputs.next().map(|input| request.resume(input))
    }
}

/// Provider answering a tee from one iterator per side.
#[derive(Debug, Clone)]
pub struct FeedBoth<L, R> {
    left: Fuse<L>,
    right: Fuse<R>,
}

/// Answer left awaits from `left` and right awaits from `right`.
pub fn feed_both<L, R>(left: L, right: R) -> FeedBoth<L::IntoIter, R::IntoIter>
where
    L: IntoIterator,
    R: IntoIterator,
{
    FeedBoth {
        left: left.into_iter().fuse(),
        right: right.into_iter().fuse(),
    }
}

impl<L, R> Provider<T<L::Item, R::Item>> for FeedBoth<L, R>
where
    L: Iterator,
    R: Iterator,
    L::Item: 'static,
    R::Item: 'static,
{
    fn provide<M: 'static>(&mut self, request: TeeRequest<L::Item, R::Item, M>) -> Option<M> {
        match request {
            TeeRequest::Left(resume) => self.left.next().map(|input| resume.resume(input)),
            TeeRequest::Right(resume) => self.right.next().map(|input| resume.resume(input)),
        }
    }
}

/// Provider answering a process from a closure.
pub struct FromFn<F> {
    f: F,
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Answer every await of a process with whatever `f` returns; `None` means
/// the input is exhausted.
pub fn from_fn<I, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Option<I>,
{
    FromFn { f }
}

impl<I, F> Provider<Is<I>> for FromFn<F>
where
    I: 'static,
    F: FnMut() -> Option<I>,
{
    fn provide<M: 'static>(&mut self, request: Resume<I, M>) -> Option<M> {
        (self.f)().map(|input| request.resume(input))
    }
}

/// Provider for which every channel is exhausted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

/// Drive a machine that needs no input, typically a [`Source`](crate::Source).
pub fn no_input() -> NoInput {
    NoInput
}

impl<K: Shape> Provider<K> for NoInput {
    fn provide<M: 'static>(&mut self, _request: K::Request<M>) -> Option<M> {
        None
    }
}

/// Provider answering a process from an iterator of results.
///
/// The first `Err` is logged and kept; from then on the input counts as
/// exhausted. The error is reported once the machine halts, through
/// [`Driver::try_next`] or [`run_fallible`].
#[derive(Debug)]
pub struct Fallible<It> {
    inputs: Fuse<It>,
    error: Option<BoxError>,
    failed: bool,
}

/// Answer every await of a process from `inputs`, stopping at the first error.
pub fn fallible<It, I, E>(inputs: It) -> Fallible<It::IntoIter>
where
    It: IntoIterator<Item = Result<I, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    Fallible {
        inputs: inputs.into_iter().fuse(),
        error: None,
        failed: false,
    }
}

impl<It, I, E> Provider<Is<I>> for Fallible<It>
where
    It: Iterator<Item = Result<I, E>>,
    I: 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    fn provide<M: 'static>(&mut self, request: Resume<I, M>) -> Option<M> {
        if self.failed {
            return None;
        }
        match self.inputs.next()? {
            Ok(input) => Some(request.resume(input)),
            Err(err) => {
                tracing::warn!(error = %err, "input provider failed, treating input as exhausted");
                self.failed = true;
                self.error = Some(Box::new(err));
                None
            }
        }
    }

    fn take_error(&mut self) -> Option<BoxError> {
        self.error.take()
    }
}

/// Iterator over the outputs of a machine driven by a provider.
///
/// Created by [`drive`].
pub struct Driver<K: Shape, O: 'static, P> {
    machine: Machine<K, O>,
    provider: P,
    config: DriveConfig,
    halted: bool,
}

/// Drive `machine`, answering its awaits from `provider`.
///
/// Nothing is evaluated until the returned driver is polled, and each poll
/// runs the machine only up to its next output.
pub fn drive<K, O, P>(machine: Machine<K, O>, provider: P) -> Driver<K, O, P>
where
    K: Shape,
    O: 'static,
    P: Provider<K>,
{
    Driver {
        machine,
        provider,
        config: DriveConfig::default(),
        halted: false,
    }
}

impl<K, O, P> Driver<K, O, P>
where
    K: Shape,
    O: 'static,
    P: Provider<K>,
{
    pub fn with_config(mut self, config: DriveConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the machine to its next output.
    ///
    /// Returns `Ok(None)` once the machine has halted. If the provider gave
    /// up on an error, that error is returned after the halt instead, once.
    pub fn try_next(&mut self) -> Result<Option<O>, DriveError> {
        let mut steps = 0;
        while !self.halted {
            match self.machine.step() {
                Step::Emit(output, next) => {
                    self.machine = next;
                    return Ok(Some(output));
                }
                Step::Await(request, fallback) => {
                    steps += 1;
                    if self.config.out_of_fuel(steps) {
                        tracing::debug!(steps, "machine out of fuel");
                        return Err(DriveError::Stalled { steps });
                    }
                    let channel = K::channel(&request);
                    match self.provider.provide(request) {
                        Some(next) => self.machine = next,
                        None => {
                            tracing::debug!(%channel, "input exhausted");
                            self.machine = fallback;
                        }
                    }
                }
                Step::Halt => {
                    tracing::trace!("machine halted");
                    self.halted = true;
                    self.machine = Machine::halt();
                }
            }
        }
        match self.provider.take_error() {
            Some(err) => Err(DriveError::Provider(err)),
            None => Ok(None),
        }
    }

    /// The machine as it stands after the outputs seen so far.
    pub fn machine(&self) -> &Machine<K, O> {
        &self.machine
    }

    pub fn into_provider(self) -> P {
        self.provider
    }
}

impl<K, O, P> Iterator for Driver<K, O, P>
where
    K: Shape,
    O: 'static,
    P: Provider<K>,
{
    type Item = O;

    /// Errors end the iteration. Use [`Driver::try_next`] to observe them.
    fn next(&mut self) -> Option<O> {
        match self.try_next() {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(error = %err, "driving stopped");
                self.halted = true;
                None
            }
        }
    }
}

impl<K: Shape, O: 'static, P> fmt::Debug for Driver<K, O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("halted", &self.halted)
            .finish_non_exhaustive()
    }
}

/// Drive `machine` until it halts and collect its outputs.
///
/// ```rust
/// use machina::prelude::*;
///
/// assert_eq!(run(take_first(2), feed(["a", "b", "c"])), vec!["a", "b"]);
/// ```
pub fn run<K, O, P>(machine: Machine<K, O>, provider: P) -> Vec<O>
where
    K: Shape,
    O: 'static,
    P: Provider<K>,
{
    drive(machine, provider).collect()
}

/// Like [`run`], but report a provider error or an exhausted fuel budget.
///
/// ```rust
/// use machina::prelude::*;
///
/// let parsed = ["1", "2", "x", "4"].map(str::parse::<u32>);
/// let result = run_fallible(echo(), fallible(parsed), DriveConfig::default());
/// assert!(matches!(result, Err(DriveError::Provider(_))));
/// ```
pub fn run_fallible<K, O, P>(
    machine: Machine<K, O>,
    provider: P,
    config: DriveConfig,
) -> Result<Vec<O>, DriveError>
where
    K: Shape,
    O: 'static,
    P: Provider<K>,
{
    let mut driver = drive(machine, provider).with_config(config);
    let mut outputs = Vec::new();
    while let Some(output) = driver.try_next()? {
        outputs.push(output);
    }
    Ok(outputs)
}

/// Async version of [`run`] for processes.
///
/// Each await is answered by the future `responder` returns; resolving to
/// `None` means the input is exhausted.
pub async fn run_async<I, O, R, Fut>(process: Process<I, O>, mut responder: R) -> Vec<O>
where
    I: 'static,
    O: 'static,
    R: FnMut() -> Fut,
    Fut: Future<Output = Option<I>>,
{
    let mut machine = process;
    let mut outputs = Vec::new();
    loop {
        match machine.step() {
            Step::Emit(output, next) => {
                outputs.push(output);
                machine = next;
            }
            Step::Await(request, fallback) => match responder().await {
                Some(input) => machine = request.resume(input),
                None => {
                    tracing::debug!("async input exhausted");
                    machine = fallback;
                }
            },
            Step::Halt => {
                tracing::trace!("machine halted");
                return outputs;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build::from_sequence,
        combinators::{echo, filter, fold, mapping, take_first, zipping},
        shape::Channel,
    };
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::future::{Future, ready};
    use std::num::ParseIntError;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::task::{Context, Poll, Wake, Waker};

    fn block_on<F: Future>(future: F) -> F::Output {
        struct Noop;
        impl Wake for Noop {
            fn wake(self: Arc<Self>) {}
        }

        let waker = Waker::from(Arc::new(Noop));
        let mut context = Context::from_waker(&waker);
        let mut future = Box::pin(future);

        loop {
            match Future::poll(future.as_mut(), &mut context) {
                Poll::Ready(value) => return value,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    #[test]
    fn test_drive_is_lazy() {
        let pulled = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&pulled);
        let inputs = (1..=10).inspect(move |x| log.borrow_mut().push(*x));
        let mut driver = drive(mapping(|x: u32| x * 10), feed(inputs));

        assert!(pulled.borrow().is_empty());
        assert_eq!(driver.next(), Some(10));
        assert_eq!(driver.next(), Some(20));
        assert_eq!(&*pulled.borrow(), &[1, 2]);
    }

    #[test]
    fn test_driver_stays_halted() {
        let mut driver = drive(take_first(1), feed([1, 2, 3]));
        assert_eq!(driver.next(), Some(1));
        assert_eq!(driver.next(), None);
        assert_eq!(driver.next(), None);
        assert!(driver.machine().step().is_halt());
    }

    #[test]
    fn test_into_provider_keeps_unread_input() {
        let mut driver = drive(take_first(2), feed([1, 2, 3, 4]));
        assert_eq!(driver.by_ref().count(), 2);
        let mut rest = driver.into_provider();
        assert_eq!(run(echo(), &mut rest), vec![3, 4]);
    }

    #[test]
    fn test_feed_both_routes_by_channel() {
        let machine = zipping::<u8, char>();
        assert_eq!(run(machine, feed_both([1, 2], ['a', 'b', 'c'])), vec![(1, 'a'), (2, 'b')]);
    }

    #[test]
    fn test_from_fn_provider() {
        let mut next = 0;
        let provider = from_fn(move || {
            next += 1;
            (next <= 3).then_some(next)
        });
        assert_eq!(run(echo(), provider), vec![1, 2, 3]);
    }

    #[test]
    fn test_no_input_exhausts_every_channel() {
        assert_eq!(run(from_sequence([1, 2]), no_input()), vec![1, 2]);
        assert_eq!(run(fold(7, |a: &u8, b: u8| a + b), no_input()), vec![7]);
        assert!(run(zipping::<u8, u8>(), no_input()).is_empty());
    }

    #[test]
    fn test_fallible_reports_first_error_after_halt() {
        let inputs: Vec<Result<u32, ParseIntError>> =
            ["1", "2", "x", "4"].into_iter().map(str::parse).collect();
        let total = fold(0, |a: &u32, b: u32| a + b);
        let mut driver = drive(total, fallible(inputs));

        assert_eq!(driver.try_next().unwrap(), Some(3));
        let err = driver.try_next().unwrap_err();
        assert!(matches!(err, DriveError::Provider(_)));
        assert_eq!(driver.try_next().unwrap(), None);
    }

    #[test]
    fn test_fallible_does_not_read_past_the_end() {
        let mut calls = 0;
        let inputs = std::iter::from_fn(move || {
            calls += 1;
            match calls {
                1 => Some(Ok::<u32, ParseIntError>(1)),
                3 => Some(Ok(2)),
                _ => None,
            }
        });
        let twice: Process<u32, u32> = echo().chain(echo());
        assert_eq!(run(twice, fallible(inputs)), vec![1]);
    }

    #[test]
    fn test_fallible_without_errors() {
        let inputs: Vec<Result<u32, ParseIntError>> = vec![Ok(1), Ok(2)];
        let outputs = run_fallible(echo(), fallible(inputs), DriveConfig::default()).unwrap();
        assert_eq!(outputs, vec![1, 2]);
    }

    #[test]
    fn test_fuel_stops_a_stalled_machine() {
        let never = filter(|_: &u64| false);
        let config = DriveConfig::new().with_fuel(100);
        let err = run_fallible(never, feed(0..), config).unwrap_err();
        assert!(matches!(err, DriveError::Stalled { steps: 101 }));
    }

    #[test]
    fn test_fuel_resets_on_output() {
        let sparse = filter(|x: &u32| x % 10 == 0).pipe(take_first(3));
        let config = DriveConfig::new().with_fuel(10);
        assert_eq!(run_fallible(sparse, feed(1..), config).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn test_iterator_ends_on_stall() {
        let never = filter(|_: &u64| false);
        let driver = drive(never, feed(0..)).with_config(DriveConfig::new().with_fuel(5));
        assert_eq!(driver.count(), 0);
    }

    #[test]
    fn test_run_async() {
        let responses = Rc::new(RefCell::new(VecDeque::from(vec![1_u32, 2, 3])));
        let outputs = block_on(run_async(mapping(|x: u32| x + 1), {
            let responses = Rc::clone(&responses);
            move || ready(responses.borrow_mut().pop_front())
        }));
        assert_eq!(outputs, vec![2, 3, 4]);
        assert!(responses.borrow().is_empty());
    }

    #[test]
    fn test_run_async_stops_asking_after_halt() {
        let asked = Rc::new(RefCell::new(0));
        let outputs = block_on(run_async(take_first(2), {
            let asked = Rc::clone(&asked);
            move || {
                *asked.borrow_mut() += 1;
                ready(Some('z'))
            }
        }));
        assert_eq!(outputs, vec!['z', 'z']);
        assert_eq!(*asked.borrow(), 2);
    }

    #[test]
    fn test_step_channel_matches_request() {
        let machine: Process<u8, u8> = echo();
        assert_eq!(machine.step().channel(), Some(Channel::Single));
    }
}
