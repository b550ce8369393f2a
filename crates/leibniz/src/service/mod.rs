//! Lifecycle controller and public entry point.
//!
//! ## Structure
//!
//! - [`handler`] - the [`Service`] that owns the accumulator and runtime.
//! - [`config`] - [`ServiceConfig`] and [`FoldOrder`].
//! - [`state`] - the `Created → Running → Stopped` state machine.

mod config;
mod handler;
mod state;

pub use config::*;
pub use handler::*;
pub use state::State;

#[cfg(test)]
mod tests;
