//! Minimal SSA program representation the location analysis runs over.
//!
//! - [`types`]: type table with aggregate-children and terminal-type queries
//! - [`nodes`]: values, instructions, blocks, and the function builder
//!
//! Base references, type information, and instruction chains are treated as
//! immutable snapshots for the lifetime of one analysis pass.

pub mod nodes;
pub mod types;
