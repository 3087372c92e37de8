//! Alias-oracle interface and the structural baseline implementation.
//!
//! The oracle answers may/must-alias queries between two *base* references;
//! path-level reasoning stays in `MemoryLocation`. The contract is
//! asymmetric on purpose: `may_alias` is conservative and must never answer
//! false when aliasing is possible (a false "cannot alias" corrupts every
//! downstream optimization), while `must_alias` answers true only for
//! provably identical storage.

use crate::ir::nodes::{Function, Instr, ValueDef, ValueId};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

pub trait AliasOracle {
    /// May the two base references point at overlapping storage?
    /// Conservative: may answer true when unsure.
    fn may_alias(&self, a: ValueId, b: ValueId) -> bool;

    /// Do the two base references provably denote identical storage?
    fn must_alias(&self, a: ValueId, b: ValueId) -> bool;
}

/// Sound structural baseline over the IR's definition chains.
///
/// Rules, in order:
/// - identical values must-alias (and therefore may-alias);
/// - two distinct stack allocations are distinct objects and cannot alias;
/// - a stack allocation cannot alias a parameter, which refers to storage
///   that existed before the allocation;
/// - everything else (parameters, loaded references, opaque values) is
///   outside what the chain can prove, so the answer degrades to "may".
pub struct BaseAliasOracle<'a> {
    func: &'a Function,
}

impl<'a> BaseAliasOracle<'a> {
    pub fn new(func: &'a Function) -> Self {
        Self { func }
    }

    fn is_stack_alloc(&self, value: ValueId) -> bool {
        match self.func.def_of(value) {
            ValueDef::Instr(id) => matches!(self.func.instr(id), Instr::StackAlloc { .. }),
            ValueDef::Param(_) => false,
        }
    }

    fn is_param(&self, value: ValueId) -> bool {
        matches!(self.func.def_of(value), ValueDef::Param(_))
    }
}

impl AliasOracle for BaseAliasOracle<'_> {
    fn may_alias(&self, a: ValueId, b: ValueId) -> bool {
        if a == b {
            return true;
        }
        if self.is_stack_alloc(a) && self.is_stack_alloc(b) {
            return false;
        }
        if (self.is_stack_alloc(a) && self.is_param(b))
            || (self.is_param(a) && self.is_stack_alloc(b))
        {
            return false;
        }
        // Opaque, loaded, or parameter bases: nothing provable
        true
    }

    fn must_alias(&self, a: ValueId, b: ValueId) -> bool {
        // Same SSA value, same storage; anything weaker is not provable here
        a == b
    }
}

#[derive(Debug, Default)]
struct OracleCache {
    may: FxHashMap<(ValueId, ValueId), bool>,
    must: FxHashMap<(ValueId, ValueId), bool>,
}

/// Explicit per-pass memoization wrapper around another oracle.
///
/// Both queries are symmetric, so keys are stored with the smaller value
/// first. The cache lives inside this wrapper and is passed around with it;
/// from the analysis's point of view the oracle stays a pure query. One
/// wrapper serves one pass and is dropped with it, never held as ambient
/// shared state.
pub struct CachedOracle<'a, O: AliasOracle> {
    inner: &'a O,
    cache: RefCell<OracleCache>,
}

impl<'a, O: AliasOracle> CachedOracle<'a, O> {
    pub fn new(inner: &'a O) -> Self {
        Self {
            inner,
            cache: RefCell::new(OracleCache::default()),
        }
    }

    fn key(a: ValueId, b: ValueId) -> (ValueId, ValueId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Number of memoized (may, must) answers.
    pub fn cached_queries(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.may.len(), cache.must.len())
    }
}

impl<O: AliasOracle> AliasOracle for CachedOracle<'_, O> {
    fn may_alias(&self, a: ValueId, b: ValueId) -> bool {
        let key = Self::key(a, b);
        if let Some(&cached) = self.cache.borrow().may.get(&key) {
            return cached;
        }
        let answer = self.inner.may_alias(a, b);
        self.cache.borrow_mut().may.insert(key, answer);
        answer
    }

    fn must_alias(&self, a: ValueId, b: ValueId) -> bool {
        let key = Self::key(a, b);
        if let Some(&cached) = self.cache.borrow().must.get(&key) {
            return cached;
        }
        let answer = self.inner.must_alias(a, b);
        self.cache.borrow_mut().must.insert(key, answer);
        answer
    }
}
