use crate::error::{Error, Result};
use portable_atomic::{AtomicU8, Ordering};

/// Lifecycle state of a [`Service`].
///
/// `Stopped` is terminal: a stopped service cannot be restarted.
///
/// [`Service`]: crate::Service
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Created = 0,
    Running = 1,
    Stopped = 2,
}

impl State {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Created,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// Lock-free state machine driving start-once / stop-once semantics.
#[derive(Debug)]
pub(crate) struct Lifecycle(AtomicU8);

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(State::Created as u8))
    }

    pub(crate) fn load(&self) -> State {
        State::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `Created → Running`. Exactly one caller can win.
    pub(crate) fn begin(&self) -> Result<()> {
        self.transition(State::Created, State::Running)
            .map_err(|current| match current {
                State::Running => Error::AlreadyStarted,
                _ => Error::AlreadyStopped,
            })
    }

    /// `Running → Stopped`. Exactly one caller can win.
    pub(crate) fn end(&self) -> Result<()> {
        self.transition(State::Running, State::Stopped)
            .map_err(|current| match current {
                State::Created => Error::NotStarted,
                _ => Error::AlreadyStopped,
            })
    }

    /// Forces the terminal state after a failed start.
    pub(crate) fn abort(&self) {
        self.0.store(State::Stopped as u8, Ordering::Release);
    }

    fn transition(&self, from: State, to: State) -> core::result::Result<(), State> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(State::from_u8)
    }
}
