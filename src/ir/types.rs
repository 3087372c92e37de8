//! Type-system collaborator for the location analysis.
//!
//! The analysis never inspects values, only their static types: whether a
//! type is an aggregate, what its ordered immediate children are, and what
//! type a projection path lands on. `TypeTable` answers exactly those three
//! questions.
//!
//! Child ordering is part of the analysis contract: expand must produce the
//! same child sequence every time it sees structurally equal input, or
//! reduce's complete-children check falls apart. Records and tuples use
//! declaration/positional order; sum types contribute every payload case in
//! declaration order followed by the discriminant.

use crate::diagnostics::AnalysisError;
use crate::location::projection::{Projection, ProjectionPath};
use crate::return_precondition_error;

/// Dense handle into a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Pre-seeded scalar types, valid in every table.
    pub const INT: TypeId = TypeId(0);
    pub const FLOAT: TypeId = TypeId(1);
    pub const BOOL: TypeId = TypeId(2);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,

    /// Record with fields in declaration order.
    Record { fields: Vec<TypeId> },

    /// Tuple with positional elements.
    Tuple { elems: Vec<TypeId> },

    /// Fixed-length array. Constant indices project individual elements.
    Array { elem: TypeId, len: u32 },

    /// Sum type. One entry per case; `None` means the case carries no
    /// payload. The discriminant is modeled as an `Int` child.
    Sum { cases: Vec<Option<TypeId>> },
}

/// Append-only registry of the types touched by one analysis.
///
/// Scalars are pre-seeded at fixed indices so callers can use
/// `TypeId::INT` etc. without interning.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self {
            types: vec![Type::Int, Type::Float, Type::Bool],
        }
    }

    /// Register a type and return its handle.
    pub fn add(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Convenience constructors for the aggregate kinds.
    pub fn record(&mut self, fields: Vec<TypeId>) -> TypeId {
        self.add(Type::Record { fields })
    }

    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.add(Type::Tuple { elems })
    }

    pub fn array(&mut self, elem: TypeId, len: u32) -> TypeId {
        self.add(Type::Array { elem, len })
    }

    pub fn sum(&mut self, cases: Vec<Option<TypeId>>) -> TypeId {
        self.add(Type::Sum { cases })
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn is_aggregate(&self, id: TypeId) -> bool {
        matches!(
            self.get(id),
            Type::Record { .. } | Type::Tuple { .. } | Type::Array { .. } | Type::Sum { .. }
        )
    }

    /// Ordered immediate children of an aggregate type, as (selector, child
    /// type) pairs. Scalars have no children.
    ///
    /// The order is fixed and deterministic; expand and reduce both depend
    /// on it.
    pub fn first_level_children(&self, id: TypeId) -> Vec<(Projection, TypeId)> {
        match self.get(id) {
            Type::Record { fields } => fields
                .iter()
                .enumerate()
                .map(|(i, ty)| (Projection::Field(i as u32), *ty))
                .collect(),
            Type::Tuple { elems } => elems
                .iter()
                .enumerate()
                .map(|(i, ty)| (Projection::Index(i as u32), *ty))
                .collect(),
            Type::Array { elem, len } => (0..*len)
                .map(|i| (Projection::Index(i), *elem))
                .collect(),
            Type::Sum { cases } => {
                // Payload cases first, discriminant last
                let mut children: Vec<(Projection, TypeId)> = cases
                    .iter()
                    .enumerate()
                    .filter_map(|(c, payload)| {
                        payload.map(|ty| (Projection::Payload(c as u32), ty))
                    })
                    .collect();
                children.push((Projection::Discriminant, TypeId::INT));
                children
            }
            Type::Int | Type::Float | Type::Bool => Vec::new(),
        }
    }

    /// Apply a single selector to a type.
    ///
    /// A selector that does not fit the type is a precondition failure: the
    /// caller built a path that was never well-typed against this base.
    pub fn project(&self, ty: TypeId, selector: Projection) -> Result<TypeId, AnalysisError> {
        match (self.get(ty), selector) {
            (Type::Record { fields }, Projection::Field(i)) => {
                match fields.get(i as usize) {
                    Some(field_ty) => Ok(*field_ty),
                    None => return_precondition_error!(
                        "field selector {} out of range for record with {} fields",
                        i,
                        fields.len() ; { AnalysisStage => "path projection" }
                    ),
                }
            }
            (Type::Tuple { elems }, Projection::Index(i)) => match elems.get(i as usize) {
                Some(elem_ty) => Ok(*elem_ty),
                None => return_precondition_error!(
                    "index selector {} out of range for tuple with {} elements",
                    i,
                    elems.len() ; { AnalysisStage => "path projection" }
                ),
            },
            (Type::Array { elem, len }, Projection::Index(i)) => {
                if i < *len {
                    Ok(*elem)
                } else {
                    return_precondition_error!(
                        "index selector {} out of range for array of length {}",
                        i,
                        len ; { AnalysisStage => "path projection" }
                    )
                }
            }
            (Type::Sum { cases }, Projection::Payload(c)) => match cases.get(c as usize) {
                Some(Some(payload_ty)) => Ok(*payload_ty),
                Some(None) => return_precondition_error!(
                    "payload selector on case {} which carries no payload",
                    c ; { AnalysisStage => "path projection" }
                ),
                None => return_precondition_error!(
                    "payload selector {} out of range for sum with {} cases",
                    c,
                    cases.len() ; { AnalysisStage => "path projection" }
                ),
            },
            (Type::Sum { .. }, Projection::Discriminant) => Ok(TypeId::INT),
            (other, selector) => return_precondition_error!(
                "selector {:?} does not apply to type {:?}",
                selector,
                other ; { AnalysisStage => "path projection" }
            ),
        }
    }

    /// The type a projection path lands on, starting from `base`. An empty
    /// path lands on the base type itself.
    pub fn terminal_type(
        &self,
        base: TypeId,
        path: &ProjectionPath,
    ) -> Result<TypeId, AnalysisError> {
        let mut current = base;
        for selector in path.selectors() {
            current = self.project(current, *selector)?;
        }
        Ok(current)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        // The scalar pre-seed means a table is never truly empty
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
