//! Projection paths: ordered selector chains from a base to a sub-object.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// One "access sub-part K" step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Record field access by declaration index.
    Field(u32),

    /// Tuple or array element access by position.
    Index(u32),

    /// Sum-type payload access for one case.
    Payload(u32),

    /// Sum-type discriminant access.
    Discriminant,
}

/// Ordered sequence of selectors from a base's type to a sub-object's type.
///
/// Paths are owned and deep-copied per location: a location may rebase or
/// subtract its path in place without aliasing another location's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProjectionPath {
    selectors: Vec<Projection>,
}

impl ProjectionPath {
    pub fn new() -> Self {
        Self {
            selectors: Vec::new(),
        }
    }

    pub fn from_selectors(selectors: Vec<Projection>) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &[Projection] {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn push(&mut self, selector: Projection) {
        self.selectors.push(selector);
    }

    /// Concatenate `other`'s selectors onto this path.
    ///
    /// Precondition: the combined chain must be well-typed against the
    /// base's type. The path itself cannot check that; violating it is a
    /// caller bug that `TypeTable::terminal_type` will surface later.
    pub fn append(&mut self, other: &ProjectionPath) {
        self.selectors.extend_from_slice(&other.selectors);
    }

    /// True iff every selector of this path is matched by `other`'s leading
    /// selectors. The empty path is a prefix of everything.
    pub fn is_prefix_of(&self, other: &ProjectionPath) -> bool {
        self.selectors.len() <= other.selectors.len()
            && self
                .selectors
                .iter()
                .zip(other.selectors.iter())
                .all(|(a, b)| a == b)
    }

    /// True iff the two paths diverge at some selector without one being a
    /// prefix of the other: the referenced sub-objects are neither equal nor
    /// nested, so they must be treated as structurally unrelated siblings.
    ///
    /// False when one path is a prefix of the other, including equal and
    /// empty paths.
    pub fn has_non_empty_symmetric_difference(&self, other: &ProjectionPath) -> bool {
        self.selectors
            .iter()
            .zip(other.selectors.iter())
            .any(|(a, b)| a != b)
    }

    /// Remove `prefix`'s leading selectors from `whole` in place.
    ///
    /// Used to rebase a location expressed relative to an outer aggregate
    /// onto an already-located inner field. `prefix` not actually being a
    /// prefix of `whole` is a precondition failure; the path is left
    /// untouched in that case.
    pub fn subtract_paths(whole: &mut ProjectionPath, prefix: &ProjectionPath) -> bool {
        if !prefix.is_prefix_of(whole) {
            return false;
        }
        whole.selectors.drain(..prefix.selectors.len());
        true
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Projection::Field(i) => write!(f, ".{}", i),
            Projection::Index(i) => write!(f, "[{}]", i),
            Projection::Payload(c) => write!(f, "!{}", c),
            Projection::Discriminant => write!(f, "#tag"),
        }
    }
}

impl Display for ProjectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for selector in &self.selectors {
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}
