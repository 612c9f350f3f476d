//! Command definitions and their hierarchical organization
//!
//! Commands are grouped and nested. Working directories and environment variables flow down
//! from parent groups to their children, while still allowing override at any level.

pub mod command;
pub mod group;
pub mod inherit;
