//! End-to-end construction of small federated computations.

use fed_ir::{init_tracing, BuildError, ErrorKind, Node, NodeKind, TupleElement, Visitor};
use fed_types::{DType, PlacementLiteral, Type};
use pretty_assertions::assert_eq;

fn int32() -> Type {
    Type::tensor(DType::Int32)
}

fn ok(result: Result<Node, BuildError>) -> Node {
    result.unwrap_or_else(|e| panic!("unexpected error: {e}"))
}

#[test]
fn select_field_of_tuple_literal() {
    init_tracing();
    let tuple = ok(Node::tuple([("x", ok(Node::reference("r", int32())))]));

    let selected = ok(Node::selection(tuple.clone(), "x"));
    assert_eq!(selected.type_signature(), &int32());
    assert_eq!(selected.to_string(), "<x=r>.x");

    match Node::selection(tuple, "y") {
        Ok(node) => panic!("selected a missing field: {node}"),
        Err(e) => assert_eq!(e.kind(), ErrorKind::IncompatibleType),
    }
}

#[test]
fn federated_sum_over_client_data() {
    init_tracing();
    let clients = Type::federated(int32(), PlacementLiteral::Clients, false);
    let server = Type::federated(int32(), PlacementLiteral::Server, true);

    let sum = ok(Node::intrinsic(
        "federated_sum",
        Type::function(Some(clients.clone()), server.clone()),
    ));
    let data = ok(Node::data("clients://numbers", clients.clone()));
    let body = ok(Node::call(sum, Some(ok(Node::reference("v", clients.clone())))));
    let block = ok(Node::block([("v", data)], body));
    let wrapped = ok(Node::lambda("unused", Type::Placement, block));

    assert_eq!(
        wrapped.type_signature(),
        &Type::function(Some(Type::Placement), server)
    );
    assert_eq!(
        wrapped.to_string(),
        "(unused -> (let v=clients://numbers in federated_sum(v)))"
    );
}

#[test]
fn rebuild_from_parts() {
    // Swap the elements of a pair by building a new tuple from selections.
    let pair_type = Type::unnamed_tuple([int32(), Type::tensor(DType::Bool)]);
    let pair = ok(Node::reference("p", pair_type));
    let swapped = ok(Node::tuple([
        TupleElement::from(ok(Node::selection(pair.clone(), 1usize))),
        TupleElement::from(ok(Node::selection(pair, 0usize))),
    ]));
    let swap = ok(Node::lambda(
        "p",
        Type::unnamed_tuple([int32(), Type::tensor(DType::Bool)]),
        swapped,
    ));
    assert_eq!(swap.to_string(), "(p -> <p[1], p[0]>)");
    assert_eq!(
        swap.type_signature().to_string(),
        "(<int32, bool> -> <bool, int32>)"
    );
}

#[test]
fn tree_can_be_read_from_many_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Node>();

    let tree = ok(Node::lambda("x", int32(), ok(Node::reference("x", int32()))));
    let rendered: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| tree.to_string()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| panic!("render thread panicked")))
            .collect()
    });
    assert!(rendered.iter().all(|r| r == "(x -> x)"));
}

#[test]
fn visitor_collects_free_style_references() {
    struct Names(Vec<String>);
    impl<'ir> Visitor<'ir> for Names {
        fn visit_reference(&mut self, _node: &'ir Node, reference: &'ir fed_ir::Reference) {
            self.0.push(reference.name().to_string());
        }
    }

    let f = ok(Node::reference("f", Type::function(Some(int32()), int32())));
    let call = ok(Node::call(f, Some(ok(Node::reference("a", int32())))));
    let mut names = Names(Vec::new());
    names.visit_node(&call);
    assert_eq!(names.0, vec!["f", "a"]);
    assert!(matches!(call.kind(), NodeKind::Call(_)));
}
