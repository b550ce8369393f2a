//! Generator → worker pool → aggregator plumbing.
//!
//! ## Structure
//!
//! - [`request`] - messages exchanged between the stages.
//! - [`processor`] - evaluation of a single unit of work.
//! - [`coordinator`] - the generator task feeding the worker pool.
//! - [`aggregator`] - the single consumer folding partials into the sum.

pub mod aggregator;
pub mod coordinator;
pub mod processor;
pub mod request;
