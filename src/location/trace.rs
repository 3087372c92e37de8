//! Trace-to-base: recover (base, path) from a raw reference.

use crate::ir::nodes::{Function, Instr, ValueDef, ValueId};
use crate::location::projection::{Projection, ProjectionPath};
use crate::trace_log;

/// Walk backward through the chain of sub-part-extraction operations that
/// produced `value`, accumulating one selector per step, until reaching a
/// value that is not itself a projection of something else. That value is
/// the base.
///
/// Allocations, parameters, and loaded values terminate the walk as ordinary
/// bases. A value produced by an operation outside the recognized projection
/// vocabulary also terminates it: tracing stops conservatively and that
/// value becomes an opaque base. This is a deliberate soundness fallback,
/// not a failure; consumers must treat an opaque base as possibly aliasing
/// anything that could share its storage.
pub fn trace_to_base(value: ValueId, func: &Function) -> (ValueId, ProjectionPath) {
    // Selectors are discovered innermost-first and reversed at the end
    let mut selectors_reversed: Vec<Projection> = Vec::new();
    let mut current = value;

    loop {
        let def = match func.def_of(current) {
            ValueDef::Param(_) => break,
            ValueDef::Instr(id) => id,
        };

        match func.instr(def) {
            Instr::FieldExtract { base, field, .. } => {
                selectors_reversed.push(Projection::Field(*field));
                current = *base;
            }
            Instr::TupleExtract { base, index, .. }
            | Instr::IndexExtract { base, index, .. } => {
                selectors_reversed.push(Projection::Index(*index));
                current = *base;
            }
            Instr::PayloadExtract { base, case, .. } => {
                selectors_reversed.push(Projection::Payload(*case));
                current = *base;
            }
            Instr::Cast { operand, .. } => {
                // Type-compatible cast: look through, no selector
                current = *operand;
            }
            Instr::StackAlloc { .. }
            | Instr::Load { .. }
            | Instr::Store { .. }
            | Instr::Opaque { .. } => break,
        }
    }

    selectors_reversed.reverse();
    let path = ProjectionPath::from_selectors(selectors_reversed);

    trace_log!("traced v{} to base v{} with path '{}'", value.0, current.0, path);

    (current, path)
}
