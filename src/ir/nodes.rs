//! Program-representation collaborator: a minimal SSA function.
//!
//! The location analysis needs two things from the surrounding IR: O(1)
//! base-reference identity, and the backward chain of projection-producing
//! instructions consumed by trace-to-base. This module supplies both with a
//! flat instruction arena plus ordered blocks; `instrs_in_order()` yields the
//! fixed textual/control-flow order that enumeration relies on.
//!
//! Builder methods type-check each projection against the `TypeTable` as it
//! is built, so an ill-typed chain is caught at construction rather than
//! surfacing later as a corrupted path.

use crate::diagnostics::AnalysisError;
use crate::ir::types::{TypeId, TypeTable};
use crate::location::projection::Projection;
use crate::return_precondition_error;

/// Identity of one SSA value.
///
/// Structural identity is producing instruction + result slot + static type;
/// every instruction here produces at most one result, so the dense value
/// index carries the full identity and compares in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

/// Index into a function's flat instruction arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrId(pub u32);

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDef {
    /// Function parameter (by position).
    Param(u32),
    /// Result of an instruction.
    Instr(InstrId),
}

/// The instruction vocabulary the analysis understands.
///
/// The four extract forms and `Cast` are the recognized projection
/// operations that trace-to-base walks through. Everything else terminates a
/// trace: allocations and loads produce fresh objects, and `Opaque` stands
/// for any computation outside the projection vocabulary (the conservative
/// fallback base).
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Stack allocation producing a reference to a fresh object.
    StackAlloc { result: ValueId },

    /// Record field access.
    FieldExtract {
        result: ValueId,
        base: ValueId,
        field: u32,
    },

    /// Tuple element access.
    TupleExtract {
        result: ValueId,
        base: ValueId,
        index: u32,
    },

    /// Constant array index access.
    IndexExtract {
        result: ValueId,
        base: ValueId,
        index: u32,
    },

    /// Sum-type payload access for one case.
    PayloadExtract {
        result: ValueId,
        base: ValueId,
        case: u32,
    },

    /// Type-compatible cast; tracing looks through it without adding a
    /// selector.
    Cast { result: ValueId, operand: ValueId },

    /// Memory read through an address.
    Load { result: ValueId, address: ValueId },

    /// Memory write through an address.
    Store { address: ValueId, value: ValueId },

    /// Arbitrary computation the analysis does not model. Its result is an
    /// opaque base.
    Opaque {
        result: Option<ValueId>,
        operands: Vec<ValueId>,
    },
}

impl Instr {
    pub fn result(&self) -> Option<ValueId> {
        match self {
            Instr::StackAlloc { result }
            | Instr::FieldExtract { result, .. }
            | Instr::TupleExtract { result, .. }
            | Instr::IndexExtract { result, .. }
            | Instr::PayloadExtract { result, .. }
            | Instr::Cast { result, .. }
            | Instr::Load { result, .. } => Some(*result),
            Instr::Opaque { result, .. } => *result,
            Instr::Store { .. } => None,
        }
    }

    /// True for instructions that read or write memory through an address.
    pub fn touches_memory(&self) -> bool {
        matches!(self, Instr::Load { .. } | Instr::Store { .. })
    }

    /// The address operand of a memory-touching instruction.
    pub fn memory_address(&self) -> Option<ValueId> {
        match self {
            Instr::Load { address, .. } | Instr::Store { address, .. } => Some(*address),
            _ => None,
        }
    }
}

/// Basic block: an ordered run of instructions.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: u32,
    pub instrs: Vec<InstrId>,
}

impl Block {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            instrs: Vec::new(),
        }
    }
}

/// One SSA function body, owning its values, instructions, and blocks.
///
/// All locations derived by the analysis are meaningful only within one
/// `Function`; they are never persisted across function boundaries.
#[derive(Debug)]
pub struct Function {
    params: Vec<ValueId>,
    blocks: Vec<Block>,
    instrs: Vec<Instr>,
    // Indexed by ValueId
    value_types: Vec<TypeId>,
    value_defs: Vec<ValueDef>,
    current_block: usize,
}

impl Function {
    /// Create a function with a single entry block.
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            blocks: vec![Block::new(0)],
            instrs: Vec::new(),
            value_types: Vec::new(),
            value_defs: Vec::new(),
            current_block: 0,
        }
    }

    fn new_value(&mut self, ty: TypeId, def: ValueDef) -> ValueId {
        let id = ValueId(self.value_types.len() as u32);
        self.value_types.push(ty);
        self.value_defs.push(def);
        id
    }

    fn push_instr(&mut self, build: impl FnOnce(ValueId) -> Instr, ty: TypeId) -> ValueId {
        let instr_id = InstrId(self.instrs.len() as u32);
        let result = self.new_value(ty, ValueDef::Instr(instr_id));
        self.instrs.push(build(result));
        self.blocks[self.current_block].instrs.push(instr_id);
        result
    }

    /// Add a parameter of the given type.
    pub fn add_param(&mut self, ty: TypeId) -> ValueId {
        let position = self.params.len() as u32;
        let id = self.new_value(ty, ValueDef::Param(position));
        self.params.push(id);
        id
    }

    /// Open a new block; subsequent instructions append to it.
    pub fn add_block(&mut self) -> u32 {
        let id = self.blocks.len() as u32;
        self.blocks.push(Block::new(id));
        self.current_block = self.blocks.len() - 1;
        id
    }

    pub fn stack_alloc(&mut self, ty: TypeId) -> ValueId {
        self.push_instr(|result| Instr::StackAlloc { result }, ty)
    }

    pub fn field_extract(
        &mut self,
        base: ValueId,
        field: u32,
        types: &TypeTable,
    ) -> Result<ValueId, AnalysisError> {
        let base_ty = self.value_type(base);
        let result_ty = types.project(base_ty, Projection::Field(field))?;
        Ok(self.push_instr(
            |result| Instr::FieldExtract {
                result,
                base,
                field,
            },
            result_ty,
        ))
    }

    pub fn tuple_extract(
        &mut self,
        base: ValueId,
        index: u32,
        types: &TypeTable,
    ) -> Result<ValueId, AnalysisError> {
        let base_ty = self.value_type(base);
        let result_ty = types.project(base_ty, Projection::Index(index))?;
        Ok(self.push_instr(
            |result| Instr::TupleExtract {
                result,
                base,
                index,
            },
            result_ty,
        ))
    }

    pub fn index_extract(
        &mut self,
        base: ValueId,
        index: u32,
        types: &TypeTable,
    ) -> Result<ValueId, AnalysisError> {
        let base_ty = self.value_type(base);
        let result_ty = types.project(base_ty, Projection::Index(index))?;
        Ok(self.push_instr(
            |result| Instr::IndexExtract {
                result,
                base,
                index,
            },
            result_ty,
        ))
    }

    pub fn payload_extract(
        &mut self,
        base: ValueId,
        case: u32,
        types: &TypeTable,
    ) -> Result<ValueId, AnalysisError> {
        let base_ty = self.value_type(base);
        let result_ty =
            types.project(base_ty, Projection::Payload(case))?;
        Ok(self.push_instr(
            |result| Instr::PayloadExtract { result, base, case },
            result_ty,
        ))
    }

    /// Type-compatible cast. The result keeps the operand's type unless a
    /// different (layout-compatible) type is supplied.
    pub fn cast(&mut self, operand: ValueId, ty: Option<TypeId>) -> ValueId {
        let result_ty = ty.unwrap_or_else(|| self.value_type(operand));
        self.push_instr(|result| Instr::Cast { result, operand }, result_ty)
    }

    pub fn load(&mut self, address: ValueId) -> ValueId {
        let ty = self.value_type(address);
        self.push_instr(|result| Instr::Load { result, address }, ty)
    }

    pub fn store(&mut self, address: ValueId, value: ValueId) -> InstrId {
        let instr_id = InstrId(self.instrs.len() as u32);
        self.instrs.push(Instr::Store { address, value });
        self.blocks[self.current_block].instrs.push(instr_id);
        instr_id
    }

    /// An arbitrary computation producing a value of `ty`.
    pub fn opaque(&mut self, operands: Vec<ValueId>, ty: TypeId) -> ValueId {
        self.push_instr(
            |result| Instr::Opaque {
                result: Some(result),
                operands,
            },
            ty,
        )
    }

    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.value_types[value.0 as usize]
    }

    pub fn def_of(&self, value: ValueId) -> ValueDef {
        self.value_defs[value.0 as usize]
    }

    pub fn instr(&self, id: InstrId) -> &Instr {
        &self.instrs[id.0 as usize]
    }

    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn value_count(&self) -> usize {
        self.value_types.len()
    }

    /// Iterate instructions in the function's fixed textual/control-flow
    /// order: blocks in creation order, instructions in order within each
    /// block. Enumeration depends on this order being reproducible.
    pub fn instrs_in_order(&self) -> impl Iterator<Item = (InstrId, &Instr)> + '_ {
        self.blocks
            .iter()
            .flat_map(|block| block.instrs.iter())
            .map(|id| (*id, self.instr(*id)))
    }

    /// Check a value belongs to this function.
    pub fn check_value(&self, value: ValueId) -> Result<(), AnalysisError> {
        if (value.0 as usize) < self.value_types.len() {
            Ok(())
        } else {
            return_precondition_error!(
                "value v{} does not belong to this function ({} values)",
                value.0,
                self.value_types.len()
            )
        }
    }
}

impl Default for Function {
    fn default() -> Self {
        Self::new()
    }
}
