//! Canonical identity for memory locations.
//!
//! A `MemoryLocation` is (base reference, projection path). It is the map/set
//! key every downstream pass agrees on: equality requires identical base and
//! identical path, equal locations hash identically, and the alias queries
//! combine the path relationship with an external oracle's verdict on the
//! bases.

use crate::diagnostics::AnalysisError;
use crate::ir::nodes::{Function, ValueId};
use crate::ir::types::{TypeId, TypeTable};
use crate::location::oracle::AliasOracle;
use crate::location::projection::ProjectionPath;
use crate::location::trace::trace_to_base;
use crate::return_precondition_error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

/// A field or sub-object reachable from a base reference through a chain of
/// selectors.
///
/// A location is valid only when the base is set and a path is present; the
/// empty path means "the whole base object". Locations hold non-owning value
/// handles into the surrounding function and are constructed transiently
/// while analyzing each memory-touching instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MemoryLocation {
    base: Option<ValueId>,
    path: Option<ProjectionPath>,
}

impl MemoryLocation {
    /// An invalid, reusable location.
    pub fn invalid() -> Self {
        Self {
            base: None,
            path: None,
        }
    }

    /// Construct from an explicit base and path. No tracing.
    pub fn new(base: ValueId, path: ProjectionPath) -> Self {
        Self {
            base: Some(base),
            path: Some(path),
        }
    }

    /// Construct from a raw reference by tracing backward through the chain
    /// of projection operations that produced it.
    pub fn from_reference(value: ValueId, func: &Function) -> Self {
        let (base, path) = trace_to_base(value, func);
        Self::new(base, path)
    }

    /// Construct from a base and two path fragments, `prefix` then `suffix`.
    pub fn with_appended_path(
        base: ValueId,
        prefix: &ProjectionPath,
        suffix: &ProjectionPath,
    ) -> Self {
        let mut path = prefix.clone();
        path.append(suffix);
        Self::new(base, path)
    }

    pub fn is_valid(&self) -> bool {
        self.base.is_some() && self.path.is_some()
    }

    /// Clear base and path, returning the location to an invalid reusable
    /// state.
    pub fn reset(&mut self) {
        self.base = None;
        self.path = None;
    }

    pub fn base(&self) -> Option<ValueId> {
        self.base
    }

    pub fn path(&self) -> Option<&ProjectionPath> {
        self.path.as_ref()
    }

    pub fn path_mut(&mut self) -> Option<&mut ProjectionPath> {
        self.path.as_mut()
    }

    /// The type of the object this location denotes: the terminal selector's
    /// target, or the base's own type for an empty path.
    pub fn value_type(
        &self,
        func: &Function,
        types: &TypeTable,
    ) -> Result<TypeId, AnalysisError> {
        let (base, path) = self.require_valid("value_type")?;
        types.terminal_type(func.value_type(base), path)
    }

    /// True iff the two paths diverge at some selector without one being a
    /// prefix of the other.
    pub fn has_non_empty_symmetric_path_difference(&self, other: &MemoryLocation) -> bool {
        match (self.path.as_ref(), other.path.as_ref()) {
            (Some(a), Some(b)) => a.has_non_empty_symmetric_difference(b),
            _ => false,
        }
    }

    /// True iff the two locations have identical projection paths. Two empty
    /// paths are identical.
    pub fn has_identical_projection_path(&self, other: &MemoryLocation) -> bool {
        match (self.path.as_ref(), other.path.as_ref()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// May the two locations denote overlapping memory?
    ///
    /// If the oracle rules out aliasing between the bases, no. Otherwise the
    /// locations may alias unless their paths diverge at the same depth with
    /// different selectors, since disjoint sibling fields of the same
    /// aggregate cannot overlap. A false answer here feeds every downstream
    /// optimization, so the path test errs on "may alias" for nested or
    /// equal paths.
    pub fn is_may_alias(&self, other: &MemoryLocation, oracle: &dyn AliasOracle) -> bool {
        let (Some(self_base), Some(other_base)) = (self.base, other.base) else {
            return false;
        };
        if !oracle.may_alias(self_base, other_base) {
            return false;
        }
        !self.has_non_empty_symmetric_path_difference(other)
    }

    /// Do the two locations provably denote the same storage? Requires the
    /// oracle's must-alias verdict on the bases and structurally identical
    /// paths.
    pub fn is_must_alias(&self, other: &MemoryLocation, oracle: &dyn AliasOracle) -> bool {
        let (Some(self_base), Some(other_base)) = (self.base, other.base) else {
            return false;
        };
        oracle.must_alias(self_base, other_base) && self.has_identical_projection_path(other)
    }

    /// Strip `prefix`'s leading selectors from this location's path,
    /// rebasing it to describe the same memory relative to an inner scope.
    ///
    /// `prefix` not being a prefix of the current path is a precondition
    /// failure.
    pub fn subtract_paths(&mut self, prefix: &ProjectionPath) -> Result<(), AnalysisError> {
        let Some(path) = self.path.as_mut() else {
            return_precondition_error!("subtract_paths on an invalid location");
        };
        if !ProjectionPath::subtract_paths(path, prefix) {
            return_precondition_error!(
                "subtract_paths: {} is not a prefix of {}",
                prefix,
                path ; { AnalysisStage => "path subtraction" }
            );
        }
        Ok(())
    }

    fn require_valid(&self, operation: &str) -> Result<(ValueId, &ProjectionPath), AnalysisError> {
        match (self.base, self.path.as_ref()) {
            (Some(base), Some(path)) => Ok((base, path)),
            _ => return_precondition_error!("{} on an invalid location", operation),
        }
    }
}

impl Display for MemoryLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (self.base, self.path.as_ref()) {
            (Some(base), Some(path)) => write!(f, "v{}{}", base.0, path),
            _ => write!(f, "<invalid location>"),
        }
    }
}

/// Hash-table key with empty/tombstone sentinels, for open-addressing
/// tables keyed directly by location.
///
/// The contract: two sentinels of the same tag are always equal regardless
/// of any location data, a sentinel never equals an occupied key, and
/// occupied keys follow `MemoryLocation` equality and hashing. Std maps need
/// no sentinels, so most callers key on `MemoryLocation` directly and only
/// sentinel-keyed tables use this wrapper.
#[derive(Debug, Clone)]
pub enum LocationKey {
    Empty,
    Tombstone,
    Occupied(MemoryLocation),
}

impl PartialEq for LocationKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LocationKey::Empty, LocationKey::Empty) => true,
            (LocationKey::Tombstone, LocationKey::Tombstone) => true,
            (LocationKey::Occupied(a), LocationKey::Occupied(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LocationKey {}

impl Hash for LocationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Sentinels hash on their tag alone, independent of any path
        match self {
            LocationKey::Empty => 0u8.hash(state),
            LocationKey::Tombstone => 1u8.hash(state),
            LocationKey::Occupied(loc) => {
                2u8.hash(state);
                loc.hash(state);
            }
        }
    }
}
