//! Input shapes, channel tags and handles.
//!
//! A machine is parameterised by a [`Shape`] describing which inputs it may
//! ask for. Every await node carries a [`Shape::Request`], a continuation that
//! is typed by the channel it waits on, so a two-input machine can ask for an
//! `A` on its left side and a `B` on its right side without ever going through
//! a shared union of both types.
//!
//! | Shape | Machine alias | Channels |
//! |-------|---------------|----------|
//! | [`Is<I>`] | [`Process<I, O>`](crate::Process) | [`Channel::Single`] |
//! | [`T<A, B>`] | [`Tee<A, B, O>`](crate::Tee) | [`Channel::Left`], [`Channel::Right`] |
//! | [`Nil`] | [`Source<O>`](crate::Source) | none |
//!
//! [`Handle`]s name one channel of a shape. Combinators written against a
//! handle, such as [`filter_on`](crate::filter_on), work unchanged on every
//! shape the handle applies to.

use std::{convert::Infallible, fmt, marker::PhantomData, rc::Rc};

/// Tag of the input stream an await node is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// The only input of a one-input machine.
    Single,
    /// The left input of a two-input machine.
    Left,
    /// The right input of a two-input machine.
    Right,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Single => write!(f, "single"),
            Channel::Left => write!(f, "left"),
            Channel::Right => write!(f, "right"),
        }
    }
}

/// The set of inputs a machine may await.
pub trait Shape: 'static {
    /// A pending request for one input value, resuming into `M` once answered.
    type Request<M: 'static>: 'static;

    /// The channel a request is waiting on.
    fn channel<M: 'static>(request: &Self::Request<M>) -> Channel;

    /// Post-compose `f` onto the continuation of a request.
    fn map_request<M, N, F>(request: Self::Request<M>, f: F) -> Self::Request<N>
    where
        M: 'static,
        N: 'static,
        F: Fn(M) -> N + 'static;
}

/// Continuation of an await node on a channel answering with `I`.
///
/// Resuming does not consume the continuation: machines are persistent values
/// and the same request may be answered more than once.
pub struct Resume<I, M>(Rc<dyn Fn(I) -> M>);

impl<I, M> Resume<I, M> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(I) -> M + 'static,
    {
        Resume(Rc::new(f))
    }

    /// Answer the request with `input`.
    pub fn resume(&self, input: I) -> M {
        (self.0)(input)
    }

    /// Transform the machine this request resumes into.
    pub fn map<N, F>(self, f: F) -> Resume<I, N>
    where
        I: 'static,
        M: 'static,
        F: Fn(M) -> N + 'static,
    {
        Resume::new(move |input| f(self.resume(input)))
    }
}

impl<I, M> Clone for Resume<I, M> {
    fn clone(&self) -> Self {
        Resume(Rc::clone(&self.0))
    }
}

impl<I, M> fmt::Debug for Resume<I, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume").finish_non_exhaustive()
    }
}

/// One input channel answering with `I`.
pub struct Is<I>(PhantomData<fn(I)>);

impl<I: 'static> Shape for Is<I> {
    type Request<M: 'static> = Resume<I, M>;

    fn channel<M: 'static>(_request: &Resume<I, M>) -> Channel {
        Channel::Single
    }

    fn map_request<M, N, F>(request: Resume<I, M>, f: F) -> Resume<I, N>
    where
        M: 'static,
        N: 'static,
        F: Fn(M) -> N + 'static,
    {
        request.map(f)
    }
}

/// Two input channels, left answering with `A` and right with `B`.
pub struct T<A, B>(PhantomData<fn(A, B)>);

/// Request of a two-input machine: which side is asked, and how to resume.
pub enum TeeRequest<A, B, M> {
    Left(Resume<A, M>),
    Right(Resume<B, M>),
}

impl<A, B, M> fmt::Debug for TeeRequest<A, B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeeRequest::Left(_) => f.write_str("TeeRequest::Left"),
            TeeRequest::Right(_) => f.write_str("TeeRequest::Right"),
        }
    }
}

impl<A: 'static, B: 'static> Shape for T<A, B> {
    type Request<M: 'static> = TeeRequest<A, B, M>;

    fn channel<M: 'static>(request: &TeeRequest<A, B, M>) -> Channel {
        match request {
            TeeRequest::Left(_) => Channel::Left,
            TeeRequest::Right(_) => Channel::Right,
        }
    }

    fn map_request<M, N, F>(request: TeeRequest<A, B, M>, f: F) -> TeeRequest<A, B, N>
    where
        M: 'static,
        N: 'static,
        F: Fn(M) -> N + 'static,
    {
        match request {
            TeeRequest::Left(resume) => TeeRequest::Left(resume.map(f)),
            TeeRequest::Right(resume) => TeeRequest::Right(resume.map(f)),
        }
    }
}

/// The shape without inputs. Its request type is uninhabited, so a
/// `Machine<Nil, O>` can never reach an await node.
pub enum Nil {}

impl Shape for Nil {
    type Request<M: 'static> = Infallible;

    fn channel<M: 'static>(request: &Infallible) -> Channel {
        match *request {}
    }

    fn map_request<M, N, F>(request: Infallible, _f: F) -> Infallible
    where
        M: 'static,
        N: 'static,
        F: Fn(M) -> N + 'static,
    {
        match request {}
    }
}

/// Addresses one input channel of shape `K`.
///
/// Plans await through a handle, which is what lets the same combinator
/// read from a process's only input or from either side of a tee.
pub trait Handle<K: Shape>: Copy + 'static {
    /// Type of the values arriving on this channel.
    type Input: 'static;

    /// The channel this handle reads.
    fn channel(self) -> Channel;

    /// Build a request on this channel resuming with `resume`.
    fn request<M, F>(self, resume: F) -> K::Request<M>
    where
        M: 'static,
        F: Fn(Self::Input) -> M + 'static;
}

/// Handle of the only input of a [`Process`](crate::Process).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Single;

/// Handle of the left input of a [`Tee`](crate::Tee).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Left;

/// Handle of the right input of a [`Tee`](crate::Tee).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Right;

impl<I: 'static> Handle<Is<I>> for Single {
    type Input = I;

    fn channel(self) -> Channel {
        Channel::Single
    }

    fn request<M, F>(self, resume: F) -> Resume<I, M>
    where
        M: 'static,
        F: Fn(I) -> M + 'static,
    {
        Resume::new(resume)
    }
}

impl<A: 'static, B: 'static> Handle<T<A, B>> for Left {
    type Input = A;

    fn channel(self) -> Channel {
        Channel::Left
    }

    fn request<M, F>(self, resume: F) -> TeeRequest<A, B, M>
    where
        M: 'static,
        F: Fn(A) -> M + 'static,
    {
        TeeRequest::Left(Resume::new(resume))
    }
}

impl<A: 'static, B: 'static> Handle<T<A, B>> for Right {
    type Input = B;

    fn channel(self) -> Channel {
        Channel::Right
    }

    fn request<M, F>(self, resume: F) -> TeeRequest<A, B, M>
    where
        M: 'static,
        F: Fn(B) -> M + 'static,
    {
        TeeRequest::Right(Resume::new(resume))
    }
}
