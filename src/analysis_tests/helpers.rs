//! Shared fixtures for the analysis tests.

use crate::ir::nodes::{Function, ValueId};
use crate::ir::types::{TypeId, TypeTable};
use crate::location::location::MemoryLocation;
use crate::location::projection::{Projection, ProjectionPath};

/// Record type `{x: Int, y: Int}`.
pub fn point_record(types: &mut TypeTable) -> TypeId {
    types.record(vec![TypeId::INT, TypeId::INT])
}

/// Nested record `{a: {p: Int, q: Int}, b: Int}`; returns (outer, inner).
pub fn nested_record(types: &mut TypeTable) -> (TypeId, TypeId) {
    let inner = types.record(vec![TypeId::INT, TypeId::INT]);
    let outer = types.record(vec![inner, TypeId::INT]);
    (outer, inner)
}

/// A function with a single stack allocation of `ty`; returns the function
/// and the allocated reference.
pub fn func_with_alloc(ty: TypeId) -> (Function, ValueId) {
    let mut func = Function::new();
    let alloc = func.stack_alloc(ty);
    (func, alloc)
}

pub fn path(selectors: &[Projection]) -> ProjectionPath {
    ProjectionPath::from_selectors(selectors.to_vec())
}

pub fn loc(base: ValueId, selectors: &[Projection]) -> MemoryLocation {
    MemoryLocation::new(base, path(selectors))
}
