//! Error types for the π accumulation service.
//!
//! The steady-state pipeline is infallible: denominators and the accumulator
//! are arbitrary precision, and the generator never emits a zero denominator.
//! What remains is lifecycle misuse, invalid configuration, and the few
//! places where the service talks to its own runtime.
//!
//! ## Error Cases
//! - `AlreadyStarted`, `AlreadyStopped`, `NotStarted`: a lifecycle operation
//!   was called from a state that does not allow it.
//! - `InvalidConfig`: a [`ServiceConfig`] value is out of range.
//! - `Runtime`: the background runtime could not be built.
//! - `ChannelError`: an internal queue closed while the pipeline expected it
//!   to be open.
//! - `DrainTimeout`: the pipeline did not finish draining in time.
//!
//! [`ServiceConfig`]: crate::ServiceConfig

use core::time::Duration;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the π accumulation service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `start()` was called on a service that is already running.
    #[error("Service is already running")]
    AlreadyStarted,

    /// `start()` or `stop()` was called on a service that has been stopped.
    #[error("Service has already been stopped")]
    AlreadyStopped,

    /// `stop()` or a drain wait was requested before `start()`.
    #[error("Service was never started")]
    NotStarted,

    /// A configuration value was rejected by [`ServiceConfig::validate`].
    ///
    /// [`ServiceConfig::validate`]: crate::ServiceConfig::validate
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The dedicated runtime could not be constructed.
    #[error("Runtime error: {context}")]
    Runtime { context: String },

    /// Internal channel send/receive failure (e.g., closed channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The pipeline was still draining when the wait expired.
    #[error("Pipeline did not drain within {timeout:?}")]
    DrainTimeout { timeout: Duration },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Runtime {
            context: err.to_string(),
        }
    }
}
