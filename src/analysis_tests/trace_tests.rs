use super::helpers::{nested_record, path, point_record};
use crate::ir::nodes::Function;
use crate::ir::types::{TypeId, TypeTable};
use crate::location::location::MemoryLocation;
use crate::location::projection::Projection;
use crate::location::trace::trace_to_base;

mod trace_to_base_tests {
    use super::*;

    #[test]
    fn allocation_is_its_own_base() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let mut func = Function::new();
        let alloc = func.stack_alloc(point);

        let (base, traced_path) = trace_to_base(alloc, &func);
        assert_eq!(base, alloc);
        assert!(traced_path.is_empty());
    }

    #[test]
    fn parameter_is_its_own_base() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let mut func = Function::new();
        let param = func.add_param(point);

        let (base, traced_path) = trace_to_base(param, &func);
        assert_eq!(base, param);
        assert!(traced_path.is_empty());
    }

    #[test]
    fn extraction_chain_accumulates_selectors_outermost_first() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let mut func = Function::new();
        let alloc = func.stack_alloc(outer);
        let a = func.field_extract(alloc, 0, &types).unwrap();
        let p = func.field_extract(a, 1, &types).unwrap();

        let (base, traced_path) = trace_to_base(p, &func);
        assert_eq!(base, alloc);
        assert_eq!(
            traced_path,
            path(&[Projection::Field(0), Projection::Field(1)])
        );
    }

    #[test]
    fn mixed_selector_kinds_keep_their_order() {
        let mut types = TypeTable::new();
        let pair = types.tuple(vec![TypeId::INT, TypeId::BOOL]);
        let arr = types.array(pair, 4);
        let sum = types.sum(vec![Some(arr), None]);

        let mut func = Function::new();
        let alloc = func.stack_alloc(sum);
        let payload = func.payload_extract(alloc, 0, &types).unwrap();
        let elem = func.index_extract(payload, 2, &types).unwrap();
        let second = func.tuple_extract(elem, 1, &types).unwrap();

        let (base, traced_path) = trace_to_base(second, &func);
        assert_eq!(base, alloc);
        assert_eq!(
            traced_path,
            path(&[
                Projection::Payload(0),
                Projection::Index(2),
                Projection::Index(1)
            ])
        );
    }

    #[test]
    fn casts_are_looked_through_without_a_selector() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let mut func = Function::new();
        let alloc = func.stack_alloc(point);
        let cast = func.cast(alloc, None);
        let x = func.field_extract(cast, 0, &types).unwrap();
        let cast_again = func.cast(x, None);

        let (base, traced_path) = trace_to_base(cast_again, &func);
        assert_eq!(base, alloc);
        assert_eq!(traced_path, path(&[Projection::Field(0)]));
    }

    #[test]
    fn loaded_value_terminates_the_walk() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let mut func = Function::new();
        let alloc = func.stack_alloc(point);
        let loaded = func.load(alloc);
        let x = func.field_extract(loaded, 0, &types).unwrap();

        let (base, traced_path) = trace_to_base(x, &func);
        assert_eq!(base, loaded);
        assert_eq!(traced_path, path(&[Projection::Field(0)]));
    }

    #[test]
    fn unrecognized_producer_becomes_an_opaque_base() {
        let mut types = TypeTable::new();
        let point = point_record(&mut types);
        let mut func = Function::new();
        let mystery = func.opaque(vec![], point);
        let x = func.field_extract(mystery, 0, &types).unwrap();

        // Tracing stops at the opaque value; the selectors below it survive
        let (base, traced_path) = trace_to_base(x, &func);
        assert_eq!(base, mystery);
        assert_eq!(traced_path, path(&[Projection::Field(0)]));

        // The opaque value itself traces to an empty path, never an error
        let (base, traced_path) = trace_to_base(mystery, &func);
        assert_eq!(base, mystery);
        assert!(traced_path.is_empty());
    }

    #[test]
    fn from_reference_wraps_the_traced_pair() {
        let mut types = TypeTable::new();
        let (outer, _inner) = nested_record(&mut types);
        let mut func = Function::new();
        let alloc = func.stack_alloc(outer);
        let a = func.field_extract(alloc, 0, &types).unwrap();

        let loc = MemoryLocation::from_reference(a, &func);
        assert_eq!(loc.base(), Some(alloc));
        assert_eq!(loc.path().unwrap(), &path(&[Projection::Field(0)]));
    }
}
