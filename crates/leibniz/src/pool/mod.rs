//! Fixed-width pool of term-evaluating worker tasks.
//!
//! - [`manager`] - round-robin dispatch over per-worker queues.
//! - [`worker`] - the per-worker receive/evaluate/forward loop.

pub mod manager;
pub mod worker;
