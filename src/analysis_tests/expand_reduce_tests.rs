use super::helpers::{func_with_alloc, loc, nested_record, point_record};
use crate::ir::types::{TypeId, TypeTable};
use crate::location::expand::{expand, first_level_locations, reduce};
use crate::location::location::MemoryLocation;
use crate::location::projection::Projection;
use rustc_hash::FxHashSet;

fn as_set(locs: Vec<MemoryLocation>) -> FxHashSet<MemoryLocation> {
    locs.into_iter().collect()
}

mod expand_tests {
    use super::*;

    #[test]
    fn scalar_location_expands_to_itself() {
        let mut types = TypeTable::new();
        let (func, alloc) = func_with_alloc(TypeId::INT);

        let scalar = loc(alloc, &[]);
        let leaves = expand(&scalar, &func, &types).unwrap();
        assert_eq!(leaves, vec![scalar]);
    }

    #[test]
    fn flat_record_expands_to_one_location_per_field() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let (func, alloc) = func_with_alloc(point);

        let leaves = expand(&loc(alloc, &[]), &func, &types).unwrap();
        assert_eq!(
            leaves,
            vec![
                loc(alloc, &[Projection::Field(0)]),
                loc(alloc, &[Projection::Field(1)])
            ]
        );
    }

    #[test]
    fn nested_record_expands_depth_first_in_declaration_order() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);

        let leaves = expand(&loc(alloc, &[]), &func, &types).unwrap();
        assert_eq!(
            leaves,
            vec![
                loc(alloc, &[Projection::Field(0), Projection::Field(0)]),
                loc(alloc, &[Projection::Field(0), Projection::Field(1)]),
                loc(alloc, &[Projection::Field(1)])
            ]
        );
    }

    #[test]
    fn array_expands_positionally() {
        let mut types = TypeTable::new();
        let arr = types.array(TypeId::FLOAT, 3);
        let (func, alloc) = func_with_alloc(arr);

        let leaves = expand(&loc(alloc, &[]), &func, &types).unwrap();
        assert_eq!(
            leaves,
            vec![
                loc(alloc, &[Projection::Index(0)]),
                loc(alloc, &[Projection::Index(1)]),
                loc(alloc, &[Projection::Index(2)])
            ]
        );
    }

    #[test]
    fn sum_expands_to_payloads_then_discriminant() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let sum = types.sum(vec![Some(point), None, Some(TypeId::BOOL)]);
        let (func, alloc) = func_with_alloc(sum);

        let leaves = expand(&loc(alloc, &[]), &func, &types).unwrap();
        assert_eq!(
            leaves,
            vec![
                loc(alloc, &[Projection::Payload(0), Projection::Field(0)]),
                loc(alloc, &[Projection::Payload(0), Projection::Field(1)]),
                loc(alloc, &[Projection::Payload(2)]),
                loc(alloc, &[Projection::Discriminant])
            ]
        );
    }

    #[test]
    fn expanding_a_leaf_is_idempotent() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let (func, alloc) = func_with_alloc(point);

        let leaves = expand(&loc(alloc, &[]), &func, &types).unwrap();
        for leaf in &leaves {
            let again = expand(leaf, &func, &types).unwrap();
            assert_eq!(again, vec![leaf.clone()]);
        }
    }

    #[test]
    fn expanding_an_interior_location_yields_only_its_subtree() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);

        let leaves = expand(&loc(alloc, &[Projection::Field(0)]), &func, &types).unwrap();
        assert_eq!(
            leaves,
            vec![
                loc(alloc, &[Projection::Field(0), Projection::Field(0)]),
                loc(alloc, &[Projection::Field(0), Projection::Field(1)])
            ]
        );
    }

    #[test]
    fn invalid_location_is_a_precondition_failure() {
        let types = TypeTable::new();
        let (func, _alloc) = func_with_alloc(TypeId::INT);

        let err = expand(&MemoryLocation::invalid(), &func, &types).unwrap_err();
        assert_eq!(err.kind, crate::diagnostics::ErrorKind::Precondition);
    }

    #[test]
    fn first_level_stops_at_immediate_children() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);

        let children = first_level_locations(&loc(alloc, &[]), &func, &types).unwrap();
        assert_eq!(
            children,
            vec![
                loc(alloc, &[Projection::Field(0)]),
                loc(alloc, &[Projection::Field(1)])
            ]
        );
    }
}

mod reduce_tests {
    use super::*;

    #[test]
    fn complete_child_set_merges_into_the_parent() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let (func, alloc) = func_with_alloc(point);
        let whole = loc(alloc, &[]);

        let leaves = as_set(expand(&whole, &func, &types).unwrap());
        let reduced = reduce(&whole, leaves, &func, &types).unwrap();

        let mut expected = FxHashSet::default();
        expected.insert(whole);
        assert_eq!(reduced, expected);
    }

    #[test]
    fn incomplete_child_set_is_left_alone() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let (func, alloc) = func_with_alloc(point);
        let whole = loc(alloc, &[]);

        // Only x present; y missing, so no merge
        let mut partial = FxHashSet::default();
        partial.insert(loc(alloc, &[Projection::Field(0)]));
        let reduced = reduce(&whole, partial.clone(), &func, &types).unwrap();
        assert_eq!(reduced, partial);
    }

    #[test]
    fn merges_cascade_to_the_outermost_aggregate() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);
        let whole = loc(alloc, &[]);

        // {a.p, a.q, b} -> {a, b} -> {whole}
        let leaves = as_set(expand(&whole, &func, &types).unwrap());
        let reduced = reduce(&whole, leaves, &func, &types).unwrap();

        let mut expected = FxHashSet::default();
        expected.insert(whole);
        assert_eq!(reduced, expected);
    }

    #[test]
    fn partial_nested_set_merges_only_the_complete_subtree() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);
        let whole = loc(alloc, &[]);

        // {a.p, a.q} merges to {a}; b is absent so the cascade stops there
        let mut partial = FxHashSet::default();
        partial.insert(loc(alloc, &[Projection::Field(0), Projection::Field(0)]));
        partial.insert(loc(alloc, &[Projection::Field(0), Projection::Field(1)]));
        let reduced = reduce(&whole, partial, &func, &types).unwrap();

        let mut expected = FxHashSet::default();
        expected.insert(loc(alloc, &[Projection::Field(0)]));
        assert_eq!(reduced, expected);
    }

    #[test]
    fn reduce_inverts_expand() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let sum = types.sum(vec![Some(point), None]);
        let pair = types.tuple(vec![sum, TypeId::INT]);
        let (func, alloc) = func_with_alloc(pair);
        let whole = loc(alloc, &[]);

        let leaves = as_set(expand(&whole, &func, &types).unwrap());
        let reduced = reduce(&whole, leaves, &func, &types).unwrap();

        let mut expected = FxHashSet::default();
        expected.insert(whole);
        assert_eq!(reduced, expected);
    }

    #[test]
    fn already_canonical_set_is_a_fixpoint() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);
        let whole = loc(alloc, &[]);

        let mut canonical = FxHashSet::default();
        canonical.insert(loc(alloc, &[Projection::Field(0)]));
        let reduced = reduce(&whole, canonical.clone(), &func, &types).unwrap();
        assert_eq!(reduced, canonical);

        let again = reduce(&whole, reduced.clone(), &func, &types).unwrap();
        assert_eq!(again, reduced);
    }

    #[test]
    fn fixpoint_is_independent_of_starting_shape() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let (func, alloc) = func_with_alloc(outer);
        let whole = loc(alloc, &[]);

        // Same memory described two ways: raw leaves, and with the inner
        // record pre-merged by hand
        let raw = as_set(expand(&whole, &func, &types).unwrap());
        let mut pre_merged = FxHashSet::default();
        pre_merged.insert(loc(alloc, &[Projection::Field(0)]));
        pre_merged.insert(loc(alloc, &[Projection::Field(1)]));

        let from_raw = reduce(&whole, raw, &func, &types).unwrap();
        let from_merged = reduce(&whole, pre_merged, &func, &types).unwrap();
        assert_eq!(from_raw, from_merged);
    }

    #[test]
    fn empty_set_reduces_to_empty() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let (func, alloc) = func_with_alloc(point);

        let reduced = reduce(&loc(alloc, &[]), FxHashSet::default(), &func, &types).unwrap();
        assert!(reduced.is_empty());
    }

    #[test]
    fn invalid_base_is_a_precondition_failure() {
        let types = TypeTable::new();
        let (func, _alloc) = func_with_alloc(TypeId::INT);

        let err = reduce(
            &MemoryLocation::invalid(),
            FxHashSet::default(),
            &func,
            &types,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::diagnostics::ErrorKind::Precondition);
    }
}
