//! Memory-location and aliasing abstraction for optimization passes.
//!
//! A location denotes a field or sub-object reachable from a base reference
//! through an ordered chain of selectors. This module gives locations a
//! canonical identity for use as map/set keys, decomposes aggregate-typed
//! locations into leaf fields, canonicalizes sets of sibling locations back
//! into the minimal covering set, answers may/must-alias queries, and
//! assigns stable dense indices to all distinct locations in a function.
//!
//! ## Module organization
//!
//! - [`projection`]: selector chains with concatenation, prefix/divergence
//!   tests, and prefix subtraction
//! - [`location`]: the `MemoryLocation` identity key and its alias queries
//! - [`trace`]: backward walk from a raw reference to its (base, path)
//! - [`expand`]: aggregate decomposition and confluent set canonicalization
//! - [`oracle`]: the external alias-oracle contract, a structural baseline,
//!   and explicit per-pass memoization
//! - [`vault`]: dense-index registry sizing bit-vector dataflow lattices
//!
//! ## Soundness
//!
//! Everything here leans conservative. Trace-to-base degrades untraceable
//! references to opaque bases rather than failing; `is_may_alias` only
//! answers false when the paths are provably disjoint sibling fields or the
//! oracle rules the bases out. A wrong "cannot alias" answer would corrupt
//! every pass built on top, so when in doubt the analysis reports overlap.
//!
//! All state is per-function and single-threaded: one pass exclusively owns
//! its vault and scratch state, and inputs are treated as immutable
//! snapshots for the lifetime of the analysis.

pub mod expand;
pub mod location;
pub mod oracle;
pub mod projection;
pub mod trace;
pub mod vault;

pub use expand::{expand, first_level_locations, reduce};
pub use location::{LocationKey, MemoryLocation};
pub use oracle::{AliasOracle, BaseAliasOracle, CachedOracle};
pub use projection::{Projection, ProjectionPath};
pub use trace::trace_to_base;
pub use vault::{LocationSummary, LocationVault, enumerate_location, enumerate_locations};
