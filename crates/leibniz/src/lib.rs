#![doc = include_str!("../README.md")]

mod error;
mod fixed;
mod pipeline;
mod pool;
mod sequence;
mod service;

pub use crate::error::*;
pub use crate::fixed::*;
pub use crate::sequence::*;
pub use crate::service::*;
