//! Expand and reduce: aggregate decomposition and canonicalization.
//!
//! A store or load at aggregate granularity must be modeled as touching
//! every leaf field it covers, so `expand` decomposes an aggregate-typed
//! location into its leaf-field locations. `reduce` is the inverse
//! canonicalization: given a set of sibling locations derived from the same
//! base, it merges complete child sets back into their parents until the set
//! is the minimal covering set for the same union of memory.
//!
//! Reduce terminates because every merge strictly shrinks the set and
//! aggregate nesting depth is finite; it is confluent, so the fixpoint does
//! not depend on merge order. This implementation processes candidate
//! parents deepest-first, which reaches the fixpoint in at most
//! nesting-depth rounds.

use crate::diagnostics::AnalysisError;
use crate::ir::nodes::Function;
use crate::ir::types::{TypeId, TypeTable};
use crate::location::location::MemoryLocation;
use crate::location::projection::ProjectionPath;
use crate::{reduce_log, return_internal_error, return_precondition_error};
use rustc_hash::FxHashSet;

/// Defensive bound on aggregate nesting. Type nesting is finite by
/// construction, so hitting this means a cyclic or corrupted type table.
const MAX_NESTING_DEPTH: usize = 64;

/// Immediate-child locations of an aggregate location, in the type table's
/// deterministic child order. A non-aggregate location has no first-level
/// locations.
pub fn first_level_locations(
    loc: &MemoryLocation,
    func: &Function,
    types: &TypeTable,
) -> Result<Vec<MemoryLocation>, AnalysisError> {
    let (Some(base), Some(path)) = (loc.base(), loc.path()) else {
        return_precondition_error!("first_level_locations on an invalid location");
    };
    let terminal = types.terminal_type(func.value_type(base), path)?;

    let mut children = Vec::new();
    for (selector, _) in types.first_level_children(terminal) {
        let mut child_path = path.clone();
        child_path.push(selector);
        children.push(MemoryLocation::new(base, child_path));
    }
    Ok(children)
}

/// Decompose a location into the locations of every leaf field it covers.
///
/// A location whose terminal type is not an aggregate expands to itself.
/// Output order is fixed: children in declaration/positional order, payloads
/// before the discriminant, recursing depth-first, so re-expanding
/// structurally equal inputs always yields identically ordered output.
pub fn expand(
    loc: &MemoryLocation,
    func: &Function,
    types: &TypeTable,
) -> Result<Vec<MemoryLocation>, AnalysisError> {
    let (Some(base), Some(path)) = (loc.base(), loc.path()) else {
        return_precondition_error!("expand on an invalid location");
    };
    let terminal = types.terminal_type(func.value_type(base), path)?;

    let mut leaves = Vec::new();
    expand_inner(base, path.clone(), terminal, types, &mut leaves, 0)?;
    Ok(leaves)
}

fn expand_inner(
    base: crate::ir::nodes::ValueId,
    path: ProjectionPath,
    ty: TypeId,
    types: &TypeTable,
    leaves: &mut Vec<MemoryLocation>,
    depth: usize,
) -> Result<(), AnalysisError> {
    if depth > MAX_NESTING_DEPTH {
        return_internal_error!(
            "aggregate nesting exceeded {} levels while expanding; type table is cyclic or corrupted",
            MAX_NESTING_DEPTH
        );
    }

    if !types.is_aggregate(ty) {
        leaves.push(MemoryLocation::new(base, path));
        return Ok(());
    }

    for (selector, child_ty) in types.first_level_children(ty) {
        let mut child_path = path.clone();
        child_path.push(selector);
        expand_inner(base, child_path, child_ty, types, leaves, depth + 1)?;
    }
    Ok(())
}

/// Canonicalize a set of sibling locations derived from the same base into
/// the fewest locations denoting the same union of memory.
///
/// Repeatedly finds an aggregate location whose complete set of
/// immediate-child expansions is present in the working set and replaces
/// those children with the single parent, bottom-up to a fixpoint. The
/// fixpoint is unique regardless of merge order.
pub fn reduce(
    base: &MemoryLocation,
    locs: FxHashSet<MemoryLocation>,
    func: &Function,
    types: &TypeTable,
) -> Result<FxHashSet<MemoryLocation>, AnalysisError> {
    if !base.is_valid() {
        return_precondition_error!("reduce with an invalid base location");
    }
    debug_assert!(
        locs.iter().all(|loc| loc.base() == base.base()),
        "reduce expects all locations to share the base"
    );

    let mut working = locs;

    // Each round merges at least one full child set or stops; depth bounds
    // the number of rounds
    for _round in 0..=MAX_NESTING_DEPTH {
        // Candidate parents: strip the last selector of every present
        // location, deepest paths first
        let mut parents: Vec<MemoryLocation> = Vec::new();
        let mut seen: FxHashSet<MemoryLocation> = FxHashSet::default();
        for loc in working.iter() {
            let (Some(loc_base), Some(path)) = (loc.base(), loc.path()) else {
                continue;
            };
            if path.is_empty() {
                continue;
            }
            let parent_path = ProjectionPath::from_selectors(
                path.selectors()[..path.len() - 1].to_vec(),
            );
            let parent = MemoryLocation::new(loc_base, parent_path);
            if seen.insert(parent.clone()) {
                parents.push(parent);
            }
        }
        parents.sort_by_key(|parent| {
            std::cmp::Reverse(parent.path().map(|p| p.len()).unwrap_or(0))
        });

        let mut merged_any = false;
        for parent in parents {
            let children = first_level_locations(&parent, func, types)?;
            if children.is_empty() {
                continue;
            }
            if children.iter().all(|child| working.contains(child)) {
                reduce_log!("merging {} children into {}", children.len(), parent);
                for child in &children {
                    working.remove(child);
                }
                working.insert(parent);
                merged_any = true;
            }
        }

        if !merged_any {
            return Ok(working);
        }
    }

    return_internal_error!(
        "reduce failed to reach a fixpoint within {} rounds",
        MAX_NESTING_DEPTH
    )
}
