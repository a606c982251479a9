use super::*;
use fed_types::{DType, Dim, PlacementLiteral};
use pretty_assertions::assert_eq;

use crate::ErrorKind;

fn int32() -> Type {
    Type::tensor(DType::Int32)
}

fn boolean() -> Type {
    Type::tensor(DType::Bool)
}

fn ok(result: Result<Node, BuildError>) -> Node {
    result.unwrap_or_else(|e| panic!("unexpected error: {e}"))
}

fn err(result: Result<Node, BuildError>) -> BuildError {
    match result {
        Ok(node) => panic!("expected an error, built {node}"),
        Err(e) => e,
    }
}

fn xy_tuple() -> Node {
    ok(Node::tuple([
        TupleElement::from(("x", ok(Node::reference("a", int32())))),
        TupleElement::from(ok(Node::reference("b", boolean()))),
    ]))
}

// === Reference ===

#[test]
fn reference_takes_given_type() {
    let r = ok(Node::reference("foo", int32()));
    assert_eq!(r.type_signature(), &int32());
    let reference = r.as_reference().unwrap_or_else(|| panic!("not a reference"));
    assert_eq!(reference.name(), "foo");
    assert_eq!(reference.context(), None);
}

#[test]
fn reference_normalizes_type_spec() {
    let r = ok(Node::reference("v", (DType::Float32, [Dim::Known(3)])));
    assert_eq!(
        r.type_signature(),
        &Type::tensor_with_shape(DType::Float32, [Dim::Known(3)])
    );
}

#[test]
fn reference_keeps_rendered_context() {
    let r = ok(Node::reference_in("x", int32(), "outer"));
    assert_eq!(r.as_reference().and_then(Reference::context), Some("outer"));
}

#[test]
fn reference_with_empty_context_has_none() {
    let r = ok(Node::reference_in("x", int32(), ""));
    assert_eq!(r.as_reference().and_then(Reference::context), None);
}

#[test]
fn reference_requires_type_and_name() {
    let missing = err(Node::reference("x", TypeSpec::Absent));
    assert_eq!(missing, BuildError::MissingType { node: "reference" });
    assert_eq!(missing.kind(), ErrorKind::InvalidArgument);

    let empty = err(Node::reference("", int32()));
    assert_eq!(empty.kind(), ErrorKind::InvalidValue);
}

// === Selection ===

#[test]
fn selection_by_name() {
    let s = ok(Node::selection(xy_tuple(), "x"));
    assert_eq!(s.type_signature(), &int32());
    let selection = s.as_selection().unwrap_or_else(|| panic!("not a selection"));
    assert_eq!(selection.name(), Some("x"));
    assert_eq!(selection.index(), None);
}

#[test]
fn selection_by_index() {
    let s = ok(Node::selection(xy_tuple(), 1usize));
    assert_eq!(s.type_signature(), &boolean());
    let selection = s.as_selection().unwrap_or_else(|| panic!("not a selection"));
    assert_eq!(selection.name(), None);
    assert_eq!(selection.index(), Some(1));
}

#[test]
fn selection_from_tuple_typed_reference() {
    let ty = Type::named_tuple(vec![(Some("a".to_string()), int32())])
        .unwrap_or_else(|e| panic!("unexpected error: {e}"));
    let s = ok(Node::selection(ok(Node::reference("t", ty)), "a"));
    assert_eq!(s.type_signature(), &int32());
}

#[test]
fn selection_of_missing_name_is_incompatible() {
    let e = err(Node::selection(xy_tuple(), "y"));
    assert!(matches!(e, BuildError::NoSuchField { ref name, .. } if name == "y"));
    assert_eq!(e.kind(), ErrorKind::IncompatibleType);
}

#[test]
fn selection_index_out_of_range() {
    let e = err(Node::selection(xy_tuple(), 2usize));
    assert_eq!(e, BuildError::IndexOutOfRange { index: 2, len: 2 });
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

#[test]
fn selection_index_message_names_exclusive_range() {
    let single = ok(Node::tuple([ok(Node::reference("a", int32()))]));
    let e = err(Node::selection(single, 1usize));
    assert_eq!(
        e.to_string(),
        "the selected index 1 does not fit into the valid range 0..1"
    );
}

#[test]
fn selection_with_empty_name() {
    let e = err(Node::selection(xy_tuple(), ""));
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

#[test]
fn selection_from_non_tuple() {
    let e = err(Node::selection(ok(Node::reference("n", int32())), 0usize));
    assert_eq!(e, BuildError::NotANamedTuple { found: int32() });
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

// === Tuple ===

#[test]
fn tuple_type_mirrors_elements() {
    let t = xy_tuple();
    let expected = Type::named_tuple(vec![(Some("x".to_string()), int32()), (None, boolean())])
        .unwrap_or_else(|e| panic!("unexpected error: {e}"));
    assert_eq!(t.type_signature(), &expected);

    let tuple = t.as_tuple().unwrap_or_else(|| panic!("not a tuple"));
    assert_eq!(tuple.len(), 2);
    assert_eq!(tuple.get_named("x").map(Node::to_string), Some("a".to_string()));
    assert_eq!(tuple.get(1).map(Node::to_string), Some("b".to_string()));
    assert!(tuple.get(2).is_none());
}

#[test]
fn empty_tuple() {
    let t = ok(Node::tuple(Vec::<Node>::new()));
    assert_eq!(t.type_signature(), &Type::unnamed_tuple(Vec::<Type>::new()));
    assert!(t.as_tuple().is_some_and(Tuple::is_empty));
}

#[test]
fn tuple_duplicate_names_rejected() {
    let e = err(Node::tuple([
        ("a", ok(Node::reference("p", int32()))),
        ("a", ok(Node::reference("q", int32()))),
    ]));
    assert_eq!(
        e,
        BuildError::Type(TypeError::DuplicateName {
            name: "a".to_string()
        })
    );
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

// === Call ===

#[test]
fn call_with_assignable_argument() {
    let open = Type::tensor_with_shape(DType::Int32, [Dim::Unknown]);
    let fixed = Type::tensor_with_shape(DType::Int32, [Dim::Known(4)]);
    let f = ok(Node::reference("f", Type::function(Some(open), boolean())));
    let c = ok(Node::call(f, Some(ok(Node::reference("v", fixed)))));
    assert_eq!(c.type_signature(), &boolean());
    assert!(c.as_call().and_then(Call::argument).is_some());
}

#[test]
fn call_without_parameter() {
    let f = ok(Node::reference("f", Type::function(None, int32())));
    let c = ok(Node::call(f, None));
    assert_eq!(c.type_signature(), &int32());
    assert!(c.as_call().is_some_and(|call| call.argument().is_none()));
}

#[test]
fn call_with_incompatible_argument() {
    let f = ok(Node::reference("f", Type::function(Some(int32()), int32())));
    let e = err(Node::call(f, Some(ok(Node::reference("b", boolean())))));
    assert_eq!(
        e,
        BuildError::ArgumentMismatch {
            parameter: int32(),
            argument: boolean(),
        }
    );
    assert_eq!(e.kind(), ErrorKind::IncompatibleType);
}

#[test]
fn call_missing_argument() {
    let f = ok(Node::reference("f", Type::function(Some(int32()), int32())));
    let e = err(Node::call(f, None));
    assert_eq!(e, BuildError::MissingArgument { parameter: int32() });
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn call_unexpected_argument() {
    let f = ok(Node::reference("f", Type::function(None, int32())));
    let e = err(Node::call(f, Some(ok(Node::reference("x", int32())))));
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn call_of_non_function() {
    let e = err(Node::call(ok(Node::reference("x", int32())), None));
    assert_eq!(e, BuildError::NotAFunction { found: int32() });
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

// === Lambda ===

#[test]
fn lambda_type_is_parameter_to_result() {
    let body = ok(Node::reference("x", int32()));
    let l = ok(Node::lambda("x", int32(), body));
    assert_eq!(
        l.type_signature(),
        &Type::function(Some(int32()), int32())
    );
    let lambda = l.as_lambda().unwrap_or_else(|| panic!("not a lambda"));
    assert_eq!(lambda.parameter_name(), "x");
    assert_eq!(lambda.parameter_type(), &int32());
}

#[test]
fn lambda_requires_parameter_type() {
    let e = err(Node::lambda("x", None::<Type>, ok(Node::reference("y", int32()))));
    assert_eq!(e, BuildError::MissingType { node: "lambda" });
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn lambda_then_call_round_trip() {
    let identity = ok(Node::lambda("x", int32(), ok(Node::reference("x", int32()))));
    let applied = ok(Node::call(identity, Some(ok(Node::data("d", int32())))));
    assert_eq!(applied.type_signature(), &int32());
}

// === Block ===

#[test]
fn block_type_is_result_type() {
    let b = ok(Node::block(
        [
            ("a", ok(Node::data("x", boolean()))),
            ("b", ok(Node::reference("a", boolean()))),
        ],
        ok(Node::reference("r", int32())),
    ));
    assert_eq!(b.type_signature(), &int32());
    let block = b.as_block().unwrap_or_else(|| panic!("not a block"));
    let names: Vec<_> = block.locals().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn block_rejects_empty_local_name() {
    let e = err(Node::block(
        [("", ok(Node::data("x", int32())))],
        ok(Node::reference("r", int32())),
    ));
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

// === Intrinsic / Data ===

#[test]
fn intrinsic_and_data_store_uri() {
    let fed = Type::federated(int32(), PlacementLiteral::Clients, false);
    let i = ok(Node::intrinsic("federated_sum", Type::function(Some(fed.clone()), int32())));
    let d = ok(Node::data("file:///tmp/clients", fed.clone()));
    assert!(matches!(i.kind(), NodeKind::Intrinsic(x) if x.uri() == "federated_sum"));
    assert!(matches!(d.kind(), NodeKind::Data(x) if x.uri() == "file:///tmp/clients"));
    assert_eq!(d.type_signature(), &fed);
}

#[test]
fn leaves_require_uri_and_type() {
    assert_eq!(
        err(Node::intrinsic("", int32())).kind(),
        ErrorKind::InvalidValue
    );
    assert_eq!(
        err(Node::data("d", TypeSpec::Absent)),
        BuildError::MissingType { node: "data" }
    );
}

// === CompiledComputation ===

fn payload(body: &[u8]) -> Computation {
    Computation::new(&Type::function(None, int32()), body.to_vec())
        .unwrap_or_else(|e| panic!("unexpected error: {e}"))
}

#[test]
fn compiled_type_comes_from_descriptor() {
    let c = ok(Node::compiled(payload(b"graph"), Some("foo".to_string())));
    assert_eq!(c.type_signature(), &Type::function(None, int32()));
    assert!(matches!(c.kind(), NodeKind::CompiledComputation(x) if x.name() == "foo"));
}

#[test]
fn compiled_default_name_is_checksum() {
    let c = ok(Node::compiled(payload(b"graph"), None));
    let NodeKind::CompiledComputation(comp) = c.kind() else {
        panic!("not a compiled computation");
    };
    assert_eq!(comp.name(), payload(b"graph").default_name());
}

#[test]
fn compiled_with_bad_descriptor() {
    let proto = Computation::from_parts(vec![0xff; 3], Vec::new());
    let e = err(Node::compiled(proto, None));
    assert!(matches!(e, BuildError::Type(TypeError::Descriptor { .. })));
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

#[test]
fn compiled_with_trailing_descriptor_bytes() {
    let mut descriptor = payload(b"graph").type_descriptor().to_vec();
    descriptor.extend_from_slice(b"garbage");
    let e = err(Node::compiled(Computation::from_parts(descriptor, Vec::new()), None));
    assert!(matches!(e, BuildError::Type(TypeError::Descriptor { .. })));
}

#[test]
fn compiled_with_runaway_descriptor() {
    let mut descriptor: Vec<u8> = std::iter::repeat(2u32.to_le_bytes())
        .take(500_000)
        .flatten()
        .collect();
    descriptor.extend_from_slice(payload(b"graph").type_descriptor());
    let e = err(Node::compiled(Computation::from_parts(descriptor, Vec::new()), None));
    assert_eq!(e.kind(), ErrorKind::InvalidValue);
}

// === Children ===

#[test]
fn children_in_evaluation_order() {
    let f = ok(Node::reference("f", Type::function(Some(int32()), int32())));
    let c = ok(Node::call(f, Some(ok(Node::reference("a", int32())))));
    let names: Vec<_> = c.children().iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["f", "a"]);
    assert!(ok(Node::data("d", int32())).children().is_empty());
}
