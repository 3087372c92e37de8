//! memloc: memory-location and aliasing analysis for an SSA compiler IR.
//!
//! The core abstraction is [`location::MemoryLocation`]: a base reference
//! plus a projection path, with canonical equality/hash identity, expand and
//! reduce over aggregate types, may/must-alias queries against an external
//! oracle, and a per-function vault assigning dense indices for bit-vector
//! dataflow. The [`ir`] module supplies the minimal type-system and
//! program-representation collaborators the analysis runs over.

pub(crate) mod dev_logging;
pub mod diagnostics;
pub mod ir;
pub mod location;

#[cfg(test)]
mod analysis_tests {
    mod helpers;

    mod expand_reduce_tests;
    mod location_tests;
    mod oracle_tests;
    mod property_tests;
    mod trace_tests;
    mod vault_tests;
}

pub use ir::nodes::{Function, InstrId, ValueId};
pub use ir::types::{Type, TypeId, TypeTable};
pub use location::{
    AliasOracle, BaseAliasOracle, CachedOracle, LocationKey, LocationSummary, LocationVault,
    MemoryLocation, Projection, ProjectionPath, enumerate_locations, expand, reduce,
    trace_to_base,
};
