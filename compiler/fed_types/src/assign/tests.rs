use crate::{DType, Dim, PlacementLiteral, Type};

fn int32() -> Type {
    Type::tensor(DType::Int32)
}

fn float32() -> Type {
    Type::tensor(DType::Float32)
}

fn tuple(fields: Vec<(Option<&str>, Type)>) -> Type {
    Type::named_tuple(fields.into_iter().map(|(n, t)| (n.map(str::to_string), t)))
        .unwrap_or_else(|e| panic!("unexpected error: {e}"))
}

#[test]
fn tensors_need_same_dtype() {
    assert!(int32().is_assignable_from(&int32()));
    assert!(!int32().is_assignable_from(&float32()));
}

#[test]
fn unknown_dims_accept_known() {
    let open = Type::tensor_with_shape(DType::Int32, [Dim::Unknown]);
    let fixed = Type::tensor_with_shape(DType::Int32, [Dim::Known(10)]);
    assert!(open.is_assignable_from(&fixed));
    assert!(!fixed.is_assignable_from(&open));
    assert!(!open.is_assignable_from(&int32()));
}

#[test]
fn unnamed_target_fields_accept_named_source() {
    let unnamed = tuple(vec![(None, int32())]);
    let named = tuple(vec![(Some("x"), int32())]);
    assert!(unnamed.is_assignable_from(&named));
    assert!(!named.is_assignable_from(&unnamed));
}

#[test]
fn tuple_names_and_lengths_must_match() {
    let x = tuple(vec![(Some("x"), int32())]);
    let y = tuple(vec![(Some("y"), int32())]);
    let xy = tuple(vec![(Some("x"), int32()), (Some("y"), int32())]);
    assert!(!x.is_assignable_from(&y));
    assert!(!x.is_assignable_from(&xy));
}

#[test]
fn functions_are_contravariant_in_parameter() {
    let open = Type::tensor_with_shape(DType::Int32, [Dim::Unknown]);
    let fixed = Type::tensor_with_shape(DType::Int32, [Dim::Known(3)]);
    let takes_open = Type::function(Some(open), int32());
    let takes_fixed = Type::function(Some(fixed), int32());
    // A function accepting any length can stand in for one accepting length 3.
    assert!(takes_fixed.is_assignable_from(&takes_open));
    assert!(!takes_open.is_assignable_from(&takes_fixed));
}

#[test]
fn function_parameter_presence_must_match() {
    let nullary = Type::function(None, int32());
    let unary = Type::function(Some(int32()), int32());
    assert!(nullary.is_assignable_from(&nullary));
    assert!(!nullary.is_assignable_from(&unary));
    assert!(!unary.is_assignable_from(&nullary));
}

#[test]
fn federated_all_equal() {
    let all_equal = Type::federated(int32(), PlacementLiteral::Clients, true);
    let per_client = Type::federated(int32(), PlacementLiteral::Clients, false);
    let server = Type::federated(int32(), PlacementLiteral::Server, true);
    assert!(per_client.is_assignable_from(&all_equal));
    assert!(!all_equal.is_assignable_from(&per_client));
    assert!(!server.is_assignable_from(&all_equal));
}

#[test]
fn different_kinds_never_assign() {
    assert!(!int32().is_assignable_from(&Type::sequence(int32())));
    assert!(!Type::Placement.is_assignable_from(&Type::abstract_type("T")));
    assert!(Type::abstract_type("T").is_assignable_from(&Type::abstract_type("T")));
}

#[test]
fn equivalence_is_mutual() {
    let a = tuple(vec![(Some("x"), int32())]);
    let b = tuple(vec![(Some("x"), int32())]);
    assert!(a.is_equivalent_to(&b));
    assert!(!a.is_equivalent_to(&tuple(vec![(None, int32())])));
}

// === Property tests ===

mod proptest_assign {
    use crate::{DType, Dim, PlacementLiteral, Type};
    use proptest::prelude::*;

    fn leaf() -> impl Strategy<Value = Type> {
        prop_oneof![
            prop_oneof![Just(DType::Int32), Just(DType::Float32), Just(DType::Bool)]
                .prop_map(Type::tensor),
            proptest::collection::vec(
                prop_oneof![Just(Dim::Unknown), (1u64..4).prop_map(Dim::Known)],
                1..3
            )
            .prop_map(|shape| Type::tensor_with_shape(DType::Int64, shape)),
            Just(Type::Placement),
            Just(Type::abstract_type("T")),
        ]
    }

    fn any_type() -> impl Strategy<Value = Type> {
        leaf().prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..3).prop_map(Type::unnamed_tuple),
                inner.clone().prop_map(Type::sequence),
                (proptest::option::of(inner.clone()), inner.clone())
                    .prop_map(|(p, r)| Type::function(p, r)),
                (inner, any::<bool>()).prop_map(|(m, all_equal)| {
                    Type::federated(m, PlacementLiteral::Clients, all_equal)
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn assignability_is_reflexive(ty in any_type()) {
            prop_assert!(ty.is_assignable_from(&ty));
        }

        #[test]
        fn equivalence_is_symmetric(a in any_type(), b in any_type()) {
            prop_assert_eq!(a.is_equivalent_to(&b), b.is_equivalent_to(&a));
        }
    }
}
