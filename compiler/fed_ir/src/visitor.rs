//! Read-only traversal of computation trees.
//!
//! Override `visit_*` methods to act on specific node kinds; call the
//! matching `walk_*` function to continue into children. The visitor may
//! mutate its own state, the tree stays immutable.
//!
//! # Example
//!
//! ```text
//! struct CountIntrinsics {
//!     count: usize,
//! }
//!
//! impl<'ir> Visitor<'ir> for CountIntrinsics {
//!     fn visit_intrinsic(&mut self, _node: &'ir Node, _intrinsic: &'ir Intrinsic) {
//!         self.count += 1;
//!     }
//! }
//! ```

use fed_stack::ensure_sufficient_stack;

use crate::node::{
    Block, Call, CompiledComputation, Data, Intrinsic, Lambda, Node, NodeKind, Reference,
    Selection, Tuple,
};

/// Computation tree visitor.
///
/// Each kind-specific method receives the whole node (for its type
/// signature) and the variant payload.
pub trait Visitor<'ir> {
    /// Visit any node. Dispatches on the node kind.
    fn visit_node(&mut self, node: &'ir Node) {
        walk_node(self, node);
    }

    fn visit_reference(&mut self, node: &'ir Node, reference: &'ir Reference) {
        let _ = (node, reference);
    }

    fn visit_selection(&mut self, node: &'ir Node, selection: &'ir Selection) {
        let _ = node;
        self.visit_node(selection.source());
    }

    fn visit_tuple(&mut self, node: &'ir Node, tuple: &'ir Tuple) {
        let _ = node;
        walk_tuple(self, tuple);
    }

    fn visit_call(&mut self, node: &'ir Node, call: &'ir Call) {
        let _ = node;
        walk_call(self, call);
    }

    fn visit_lambda(&mut self, node: &'ir Node, lambda: &'ir Lambda) {
        let _ = node;
        self.visit_node(lambda.result());
    }

    fn visit_block(&mut self, node: &'ir Node, block: &'ir Block) {
        let _ = node;
        walk_block(self, block);
    }

    /// Visit one local binding of a block.
    fn visit_local(&mut self, name: &'ir str, value: &'ir Node) {
        let _ = name;
        self.visit_node(value);
    }

    fn visit_intrinsic(&mut self, node: &'ir Node, intrinsic: &'ir Intrinsic) {
        let _ = (node, intrinsic);
    }

    fn visit_data(&mut self, node: &'ir Node, data: &'ir Data) {
        let _ = (node, data);
    }

    fn visit_compiled(&mut self, node: &'ir Node, comp: &'ir CompiledComputation) {
        let _ = (node, comp);
    }
}

// Walk Functions
//
// Children are visited depth-first in evaluation order: call function
// before argument, block locals in binding order before the result.

/// Dispatch `node` to the kind-specific visit method.
pub fn walk_node<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, node: &'ir Node) {
    ensure_sufficient_stack(|| match node.kind() {
        NodeKind::Reference(r) => visitor.visit_reference(node, r),
        NodeKind::Selection(s) => visitor.visit_selection(node, s),
        NodeKind::Tuple(t) => visitor.visit_tuple(node, t),
        NodeKind::Call(c) => visitor.visit_call(node, c),
        NodeKind::Lambda(l) => visitor.visit_lambda(node, l),
        NodeKind::Block(b) => visitor.visit_block(node, b),
        NodeKind::Intrinsic(i) => visitor.visit_intrinsic(node, i),
        NodeKind::Data(d) => visitor.visit_data(node, d),
        NodeKind::CompiledComputation(c) => visitor.visit_compiled(node, c),
    });
}

pub fn walk_tuple<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, tuple: &'ir Tuple) {
    for (_, element) in tuple.iter() {
        visitor.visit_node(element);
    }
}

pub fn walk_call<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, call: &'ir Call) {
    visitor.visit_node(call.function());
    if let Some(argument) = call.argument() {
        visitor.visit_node(argument);
    }
}

pub fn walk_block<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, block: &'ir Block) {
    for (name, value) in block.locals() {
        visitor.visit_local(name, value);
    }
    visitor.visit_node(block.result());
}
