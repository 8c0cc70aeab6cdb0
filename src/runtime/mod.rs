//! Runtime support for reactive reads.
//!
//! This module provides the infrastructure for dependency tracking between
//! containers and the effects that read them.

mod context;

pub use context::ReactiveRuntime;
pub(crate) use context::Observer;
