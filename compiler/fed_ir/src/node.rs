//! Computation tree nodes.
//!
//! A [`Node`] pairs a resolved type signature with one of nine
//! [`NodeKind`]s. Nodes are immutable: the only way to obtain one is
//! through the checked constructors in `build`, and all accessors hand out
//! shared references. Each composite node owns its children.
//!
//! Trees may nest far deeper than the native stack allows. Cloning,
//! comparing and hashing recurse under [`ensure_sufficient_stack`];
//! dropping walks the tree with a worklist.

use std::hash::{Hash, Hasher};

use fed_stack::ensure_sufficient_stack;
use fed_types::{FieldTuple, Type};

use crate::Computation;

/// A typed node of a computation tree.
#[derive(Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) type_signature: Type,
    pub(crate) kind: NodeKind,
}

impl Clone for Node {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| Node {
            type_signature: self.type_signature.clone(),
            kind: self.kind.clone(),
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| {
            self.type_signature == other.type_signature && self.kind == other.kind
        })
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ensure_sufficient_stack(|| {
            self.type_signature.hash(state);
            self.kind.hash(state);
        });
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut kind) = pending.pop() {
            detach_children(&mut kind, &mut pending);
        }
    }
}

/// Move the kinds of compound children into `pending`, leaving each child
/// hollow so releasing `kind` afterwards does not recurse.
fn detach_children(kind: &mut NodeKind, pending: &mut Vec<NodeKind>) {
    match kind {
        NodeKind::Selection(selection) => detach(&mut selection.source, pending),
        NodeKind::Tuple(tuple) => {
            for node in tuple.elements.values_mut() {
                detach(node, pending);
            }
        }
        NodeKind::Call(call) => {
            detach(&mut call.function, pending);
            if let Some(argument) = &mut call.argument {
                detach(argument, pending);
            }
        }
        NodeKind::Lambda(lambda) => detach(&mut lambda.result, pending),
        NodeKind::Block(block) => {
            for (_, value) in &mut block.locals {
                detach(value, pending);
            }
            detach(&mut block.result, pending);
        }
        NodeKind::Reference(_)
        | NodeKind::Intrinsic(_)
        | NodeKind::Data(_)
        | NodeKind::CompiledComputation(_) => {}
    }
}

fn detach(node: &mut Node, pending: &mut Vec<NodeKind>) {
    if node.kind.is_leaf() {
        return;
    }
    let hollow = NodeKind::Data(Data { uri: String::new() });
    pending.push(std::mem::replace(&mut node.kind, hollow));
}

/// The nine node variants.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A name bound earlier by a lambda or block.
    Reference(Reference),
    /// One element of a named-tuple-typed value.
    Selection(Selection),
    /// Named and unnamed elements.
    Tuple(Tuple),
    /// Function application.
    Call(Call),
    /// Single-parameter function.
    Lambda(Lambda),
    /// Sequential local bindings followed by a result.
    Block(Block),
    /// Built-in operator identified by URI.
    Intrinsic(Intrinsic),
    /// External data source identified by URI.
    Data(Data),
    /// Already-serialized computation.
    CompiledComputation(CompiledComputation),
}

impl NodeKind {
    fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Reference(_)
                | NodeKind::Intrinsic(_)
                | NodeKind::Data(_)
                | NodeKind::CompiledComputation(_)
        )
    }

    /// Short variant name, for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Reference(_) => "reference",
            NodeKind::Selection(_) => "selection",
            NodeKind::Tuple(_) => "tuple",
            NodeKind::Call(_) => "call",
            NodeKind::Lambda(_) => "lambda",
            NodeKind::Block(_) => "block",
            NodeKind::Intrinsic(_) => "intrinsic",
            NodeKind::Data(_) => "data",
            NodeKind::CompiledComputation(_) => "compiled computation",
        }
    }
}

impl Node {
    /// The type computed when this node was built.
    #[inline]
    pub fn type_signature(&self) -> &Type {
        &self.type_signature
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Direct children in evaluation order.
    ///
    /// Call yields function then argument; block yields local values in
    /// binding order then the result.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Reference(_)
            | NodeKind::Intrinsic(_)
            | NodeKind::Data(_)
            | NodeKind::CompiledComputation(_) => Vec::new(),
            NodeKind::Selection(selection) => vec![selection.source()],
            NodeKind::Tuple(tuple) => tuple.elements.values().collect(),
            NodeKind::Call(call) => {
                let mut children = vec![call.function()];
                children.extend(call.argument());
                children
            }
            NodeKind::Lambda(lambda) => vec![lambda.result()],
            NodeKind::Block(block) => block
                .locals
                .iter()
                .map(|(_, value)| value)
                .chain(std::iter::once(block.result()))
                .collect(),
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match &self.kind {
            NodeKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_selection(&self) -> Option<&Selection> {
        match &self.kind {
            NodeKind::Selection(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match &self.kind {
            NodeKind::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            NodeKind::Call(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match &self.kind {
            NodeKind::Lambda(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            NodeKind::Block(b) => Some(b),
            _ => None,
        }
    }
}

/// Reference to a name bound by an enclosing lambda or block.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    pub(crate) name: String,
    pub(crate) context: Option<String>,
}

impl Reference {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendered form of the context the name was defined in, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

/// How a selection picks its element.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Selector {
    Name(String),
    Index(usize),
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

/// Selection of one element from a named-tuple-typed source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub(crate) source: Box<Node>,
    pub(crate) selector: Selector,
}

impl Selection {
    pub fn source(&self) -> &Node {
        &self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Selected name; `None` for selection by index.
    pub fn name(&self) -> Option<&str> {
        match &self.selector {
            Selector::Name(name) => Some(name),
            Selector::Index(_) => None,
        }
    }

    /// Selected index; `None` for selection by name.
    pub fn index(&self) -> Option<usize> {
        match self.selector {
            Selector::Index(index) => Some(index),
            Selector::Name(_) => None,
        }
    }
}

/// One element handed to [`Node::tuple`]: a node, optionally named.
#[derive(Clone, Debug)]
pub struct TupleElement {
    pub name: Option<String>,
    pub value: Node,
}

impl From<Node> for TupleElement {
    fn from(value: Node) -> Self {
        TupleElement { name: None, value }
    }
}

impl From<(&str, Node)> for TupleElement {
    fn from((name, value): (&str, Node)) -> Self {
        TupleElement {
            name: Some(name.to_string()),
            value,
        }
    }
}

impl From<(String, Node)> for TupleElement {
    fn from((name, value): (String, Node)) -> Self {
        TupleElement {
            name: Some(name),
            value,
        }
    }
}

impl From<(Option<String>, Node)> for TupleElement {
    fn from((name, value): (Option<String>, Node)) -> Self {
        TupleElement { name, value }
    }
}

/// Tuple of nodes; read access delegates to its [`FieldTuple`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuple {
    pub(crate) elements: FieldTuple<Node>,
}

impl Tuple {
    pub fn elements(&self) -> &FieldTuple<Node> {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.elements.get(index).ok()
    }

    pub fn get_named(&self, name: &str) -> Option<&Node> {
        self.elements.get_named(name).ok()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Option<&str>, &Node)> {
        self.elements.iter()
    }
}

/// Application of a function to an optional argument.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    pub(crate) function: Box<Node>,
    pub(crate) argument: Option<Box<Node>>,
}

impl Call {
    pub fn function(&self) -> &Node {
        &self.function
    }

    /// Present exactly when the function type has a parameter.
    pub fn argument(&self) -> Option<&Node> {
        self.argument.as_deref()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Lambda {
    pub(crate) parameter_name: String,
    pub(crate) parameter_type: Type,
    pub(crate) result: Box<Node>,
}

impl Lambda {
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn parameter_type(&self) -> &Type {
        &self.parameter_type
    }

    pub fn result(&self) -> &Node {
        &self.result
    }
}

/// `let` block. Each local may refer to earlier locals; scoping is left to
/// consumers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub(crate) locals: Vec<(String, Node)>,
    pub(crate) result: Box<Node>,
}

impl Block {
    /// Local bindings in declaration order.
    pub fn locals(&self) -> &[(String, Node)] {
        &self.locals
    }

    pub fn result(&self) -> &Node {
        &self.result
    }
}

/// Built-in operator. The URI is not interpreted here.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Intrinsic {
    pub(crate) uri: String,
}

impl Intrinsic {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// External data. The URI is not interpreted here.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Data {
    pub(crate) uri: String,
}

impl Data {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledComputation {
    pub(crate) proto: Computation,
    pub(crate) name: String,
}

impl CompiledComputation {
    pub fn proto(&self) -> &Computation {
        &self.proto
    }

    /// Debug name: the one supplied at construction, or a checksum of the
    /// payload.
    pub fn name(&self) -> &str {
        &self.name
    }
}
