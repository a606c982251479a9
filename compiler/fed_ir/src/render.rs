//! Text forms of nodes.
//!
//! - `Display`: the compact expression form, e.g. `(x -> f(x.a))`.
//! - [`Node::repr`]: the structural form that mirrors the constructor
//!   calls, e.g. `Lambda('x', TensorType(int32), Reference('x', ...))`.

use std::fmt;
use std::hash::Hasher;

use fed_stack::ensure_sufficient_stack;
use fed_types::push_quoted;
use rustc_hash::FxHasher;

use crate::node::{Node, NodeKind, Selector};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match &self.kind {
            NodeKind::Reference(reference) => match reference.context() {
                Some(context) => write!(f, "{}@{context}", reference.name()),
                None => f.write_str(reference.name()),
            },
            NodeKind::Selection(selection) => match selection.selector() {
                Selector::Name(name) => write!(f, "{}.{name}", selection.source()),
                Selector::Index(index) => write!(f, "{}[{index}]", selection.source()),
            },
            NodeKind::Tuple(tuple) => write!(f, "{}", tuple.elements()),
            NodeKind::Call(call) => match call.argument() {
                Some(argument) => write!(f, "{}({argument})", call.function()),
                None => write!(f, "{}()", call.function()),
            },
            NodeKind::Lambda(lambda) => {
                write!(f, "({} -> {})", lambda.parameter_name(), lambda.result())
            }
            NodeKind::Block(block) => {
                f.write_str("(let ")?;
                for (i, (name, value)) in block.locals().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                write!(f, " in {})", block.result())
            }
            NodeKind::Intrinsic(intrinsic) => f.write_str(intrinsic.uri()),
            NodeKind::Data(data) => f.write_str(data.uri()),
            NodeKind::CompiledComputation(comp) => write!(f, "comp({})", comp.name()),
        })
    }
}

impl Node {
    /// Structural form mirroring the constructor calls that built this node.
    pub fn repr(&self) -> String {
        let mut buf = String::new();
        self.repr_into(&mut buf);
        buf
    }

    /// Append [`Node::repr`] to `buf`.
    pub fn repr_into(&self, buf: &mut String) {
        ensure_sufficient_stack(|| match &self.kind {
            NodeKind::Reference(reference) => {
                buf.push_str("Reference(");
                push_quoted(buf, reference.name());
                buf.push_str(", ");
                self.type_signature.repr_into(buf);
                if let Some(context) = reference.context() {
                    buf.push_str(", ");
                    push_quoted(buf, context);
                }
                buf.push(')');
            }
            NodeKind::Selection(selection) => {
                buf.push_str("Selection(");
                selection.source().repr_into(buf);
                match selection.selector() {
                    Selector::Name(name) => {
                        buf.push_str(", name=");
                        push_quoted(buf, name);
                    }
                    Selector::Index(index) => {
                        buf.push_str(", index=");
                        buf.push_str(&index.to_string());
                    }
                }
                buf.push(')');
            }
            NodeKind::Tuple(tuple) => {
                buf.push_str("Tuple([");
                for (i, (name, value)) in tuple.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push('(');
                    match name {
                        Some(name) => push_quoted(buf, name),
                        None => buf.push_str("None"),
                    }
                    buf.push_str(", ");
                    value.repr_into(buf);
                    buf.push(')');
                }
                buf.push_str("])");
            }
            NodeKind::Call(call) => {
                buf.push_str("Call(");
                call.function().repr_into(buf);
                if let Some(argument) = call.argument() {
                    buf.push_str(", ");
                    argument.repr_into(buf);
                }
                buf.push(')');
            }
            NodeKind::Lambda(lambda) => {
                buf.push_str("Lambda(");
                push_quoted(buf, lambda.parameter_name());
                buf.push_str(", ");
                lambda.parameter_type().repr_into(buf);
                buf.push_str(", ");
                lambda.result().repr_into(buf);
                buf.push(')');
            }
            NodeKind::Block(block) => {
                buf.push_str("Block([");
                for (i, (name, value)) in block.locals().iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push('(');
                    push_quoted(buf, name);
                    buf.push_str(", ");
                    value.repr_into(buf);
                    buf.push(')');
                }
                buf.push_str("], ");
                block.result().repr_into(buf);
                buf.push(')');
            }
            NodeKind::Intrinsic(intrinsic) => {
                buf.push_str("Intrinsic(");
                push_quoted(buf, intrinsic.uri());
                buf.push_str(", ");
                self.type_signature.repr_into(buf);
                buf.push(')');
            }
            NodeKind::Data(data) => {
                buf.push_str("Data(");
                push_quoted(buf, data.uri());
                buf.push_str(", ");
                self.type_signature.repr_into(buf);
                buf.push(')');
            }
            NodeKind::CompiledComputation(comp) => {
                buf.push_str("CompiledComputation(");
                buf.push_str(comp.name());
                buf.push_str(", ");
                self.type_signature.repr_into(buf);
                buf.push(')');
            }
        });
    }

    /// `FxHasher` fingerprint of [`Node::repr`].
    ///
    /// Equal for structurally identical trees, including their types.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(self.repr().as_bytes());
        hasher.finish()
    }
}
