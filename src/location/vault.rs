//! Location vault: stable dense indices for dataflow bit vectors.
//!
//! Dataflow passes want to represent "the set of locations with property P"
//! as a bit vector, which needs every distinct location in the function to
//! own a small dense index. The vault assigns those indices append-only; an
//! index is stable for the duration of one pass and invalidated if the
//! function changes.

use crate::diagnostics::AnalysisError;
use crate::ir::nodes::{Function, InstrId, ValueId};
use crate::ir::types::TypeTable;
use crate::location::expand::expand;
use crate::location::location::MemoryLocation;
use crate::vault_log;
use rustc_hash::FxHashMap;

/// Per-function registry mapping each distinct location to a 0-based dense
/// index.
#[derive(Debug, Default)]
pub struct LocationVault {
    /// All registered locations in insertion order.
    locations: Vec<MemoryLocation>,
    /// Reverse lookup: location -> index.
    index: FxHashMap<MemoryLocation, usize>,
}

impl LocationVault {
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Register a location and return its index. Already-present locations
    /// keep their existing index.
    pub fn insert(&mut self, loc: MemoryLocation) -> usize {
        if let Some(&existing) = self.index.get(&loc) {
            return existing;
        }
        let idx = self.locations.len();
        vault_log!("vault[{}] = {}", idx, loc);
        self.locations.push(loc.clone());
        self.index.insert(loc, idx);
        idx
    }

    pub fn index_of(&self, loc: &MemoryLocation) -> Option<usize> {
        self.index.get(loc).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&MemoryLocation> {
        self.locations.get(idx)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &MemoryLocation)> {
        self.locations.iter().enumerate()
    }
}

/// Result of enumerating a function: the vault plus, for each
/// memory-touching instruction, the indices of the leaf locations it
/// touches.
#[derive(Debug, Default)]
pub struct LocationSummary {
    pub vault: LocationVault,
    pub per_instruction: FxHashMap<InstrId, Vec<usize>>,
}

/// Derive, expand, and register the locations touched through one memory
/// reference. Returns the vault indices of the resulting leaf locations.
pub fn enumerate_location(
    reference: ValueId,
    func: &Function,
    types: &TypeTable,
    vault: &mut LocationVault,
) -> Result<Vec<usize>, AnalysisError> {
    func.check_value(reference)?;
    let loc = MemoryLocation::from_reference(reference, func);

    // Aggregate-granularity accesses are modeled per leaf field
    let leaves = expand(&loc, func, types)?;

    Ok(leaves.into_iter().map(|leaf| vault.insert(leaf)).collect())
}

/// Enumerate every location touched by the function, in its fixed
/// instruction order.
///
/// Each distinct leaf location is assigned exactly one index; re-running on
/// an unchanged function reproduces the same assignment.
pub fn enumerate_locations(
    func: &Function,
    types: &TypeTable,
) -> Result<LocationSummary, AnalysisError> {
    let mut summary = LocationSummary::default();

    for (instr_id, instr) in func.instrs_in_order() {
        let Some(address) = instr.memory_address() else {
            continue;
        };
        let indices = enumerate_location(address, func, types, &mut summary.vault)?;
        summary.per_instruction.insert(instr_id, indices);
    }

    Ok(summary)
}
