//! Command chains
//!
//! A parent command can declare an ordered list of member commands that run after it. The
//! [`GraphBuilder`] turns declared edges into a read-only [`ChainRegistry`], which is then
//! shared by the [`ChainExecutor`] wrapping each parent and by the [`InvocationGuard`] that
//! stops members from being invoked on their own.

pub mod builder;
pub mod executor;
pub mod guard;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{ChainGraph, Edge, GraphBuilder};
pub use executor::ChainExecutor;
pub use guard::{GuardViolation, InvocationGuard, Verdict};
pub use registry::ChainRegistry;
