//! Shared foundational types used across the conemap workspace.
//!
//! This crate provides the time representation used by required-time
//! propagation (including the unconstrained sentinel and the tightening rule)
//! and the common internal-error result type.

#![warn(missing_docs)]

pub mod result;
pub mod time;

pub use result::{ConemapResult, InternalError};
pub use time::{is_constrained, tighten, Time, UNCONSTRAINED};
