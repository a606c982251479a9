//! Checked node constructors.
//!
//! Each constructor derives the new node's type from its children and
//! rejects any combination that does not type-check. On success a
//! `trace` event records the node kind and type; on failure a `debug`
//! event records the error before it is returned.

use fed_types::{to_type, FieldTuple, Type, TypeError, TypeSpec};

use crate::node::{
    Block, Call, CompiledComputation, Data, Intrinsic, Lambda, Node, NodeKind, Reference,
    Selection, Selector, Tuple, TupleElement,
};
use crate::{BuildError, Computation};

impl Node {
    /// Reference to `name` with the given type.
    pub fn reference(
        name: impl Into<String>,
        type_spec: impl Into<TypeSpec>,
    ) -> Result<Node, BuildError> {
        build_reference(name.into(), type_spec.into(), None).inspect_err(rejected("reference"))
    }

    /// Reference to `name` defined in `context`.
    ///
    /// Only the rendered form of the context is kept; a context that
    /// renders empty counts as no context.
    pub fn reference_in(
        name: impl Into<String>,
        type_spec: impl Into<TypeSpec>,
        context: impl std::fmt::Display,
    ) -> Result<Node, BuildError> {
        let context = Some(context.to_string()).filter(|c| !c.is_empty());
        build_reference(name.into(), type_spec.into(), context).inspect_err(rejected("reference"))
    }

    /// Select an element of `source` by name or index.
    pub fn selection(source: Node, selector: impl Into<Selector>) -> Result<Node, BuildError> {
        build_selection(source, selector.into()).inspect_err(rejected("selection"))
    }

    /// Tuple of bare nodes and `(name, node)` pairs.
    pub fn tuple<I>(elements: I) -> Result<Node, BuildError>
    where
        I: IntoIterator,
        I::Item: Into<TupleElement>,
    {
        build_tuple(elements.into_iter().map(Into::into)).inspect_err(rejected("tuple"))
    }

    /// Apply `function` to `argument`.
    ///
    /// The argument must be present exactly when the function type has a
    /// parameter, and its type must be assignable to that parameter.
    pub fn call(function: Node, argument: Option<Node>) -> Result<Node, BuildError> {
        build_call(function, argument).inspect_err(rejected("call"))
    }

    /// Lambda binding `parameter_name` of `parameter_type` in `result`.
    pub fn lambda(
        parameter_name: impl Into<String>,
        parameter_type: impl Into<TypeSpec>,
        result: Node,
    ) -> Result<Node, BuildError> {
        build_lambda(parameter_name.into(), parameter_type.into(), result)
            .inspect_err(rejected("lambda"))
    }

    /// Block of sequential local bindings followed by `result`.
    pub fn block<I, N>(locals: I, result: Node) -> Result<Node, BuildError>
    where
        I: IntoIterator<Item = (N, Node)>,
        N: Into<String>,
    {
        let locals = locals.into_iter().map(|(n, v)| (n.into(), v)).collect();
        build_block(locals, result).inspect_err(rejected("block"))
    }

    pub fn intrinsic(
        uri: impl Into<String>,
        type_spec: impl Into<TypeSpec>,
    ) -> Result<Node, BuildError> {
        let uri = uri.into();
        build_leaf("intrinsic", &uri, type_spec.into())
            .map(|ty| finish(NodeKind::Intrinsic(Intrinsic { uri }), ty))
            .inspect_err(rejected("intrinsic"))
    }

    pub fn data(uri: impl Into<String>, type_spec: impl Into<TypeSpec>) -> Result<Node, BuildError> {
        let uri = uri.into();
        build_leaf("data", &uri, type_spec.into())
            .map(|ty| finish(NodeKind::Data(Data { uri }), ty))
            .inspect_err(rejected("data"))
    }

    /// Wrap a compiled payload. Without a `name`, the payload checksum is
    /// used (see [`Computation::default_name`]).
    pub fn compiled(proto: Computation, name: Option<String>) -> Result<Node, BuildError> {
        build_compiled(proto, name).inspect_err(rejected("compiled computation"))
    }
}

fn rejected(node: &'static str) -> impl Fn(&BuildError) {
    move |err| tracing::debug!(node, kind = ?err.kind(), %err, "rejected node")
}

fn finish(kind: NodeKind, type_signature: Type) -> Node {
    tracing::trace!(node = kind.name(), ty = %type_signature, "built node");
    Node {
        type_signature,
        kind,
    }
}

fn require_type(node: &'static str, spec: TypeSpec) -> Result<Type, BuildError> {
    to_type(spec)?.ok_or(BuildError::MissingType { node })
}

fn require_name(node: &'static str, what: &'static str, name: &str) -> Result<(), BuildError> {
    if name.is_empty() {
        Err(BuildError::EmptyName { node, what })
    } else {
        Ok(())
    }
}

fn build_reference(
    name: String,
    spec: TypeSpec,
    context: Option<String>,
) -> Result<Node, BuildError> {
    require_name("reference", "name", &name)?;
    let ty = require_type("reference", spec)?;
    Ok(finish(NodeKind::Reference(Reference { name, context }), ty))
}

fn build_selection(source: Node, selector: Selector) -> Result<Node, BuildError> {
    let Some(fields) = source.type_signature.as_named_tuple() else {
        return Err(BuildError::NotANamedTuple {
            found: source.type_signature.clone(),
        });
    };
    let ty = match &selector {
        Selector::Name(name) => {
            require_name("selection", "name", name)?;
            match fields.get_named(name) {
                Ok(ty) => ty.clone(),
                Err(TypeError::NoSuchField { .. }) => {
                    return Err(BuildError::NoSuchField {
                        name: name.clone(),
                        source_type: source.type_signature.clone(),
                    })
                }
                Err(err) => return Err(err.into()),
            }
        }
        Selector::Index(index) => match fields.get(*index) {
            Ok(ty) => ty.clone(),
            Err(_) => {
                return Err(BuildError::IndexOutOfRange {
                    index: *index,
                    len: fields.len(),
                })
            }
        },
    };
    Ok(finish(
        NodeKind::Selection(Selection {
            source: Box::new(source),
            selector,
        }),
        ty,
    ))
}

fn build_tuple(elements: impl Iterator<Item = TupleElement>) -> Result<Node, BuildError> {
    let elements = FieldTuple::new(elements.map(|e| (e.name, e.value)))?;
    let ty = Type::from(elements.map(|node| node.type_signature.clone()));
    Ok(finish(NodeKind::Tuple(Tuple { elements }), ty))
}

fn build_call(function: Node, argument: Option<Node>) -> Result<Node, BuildError> {
    let Some((parameter, result)) = function.type_signature.as_function() else {
        return Err(BuildError::NotAFunction {
            found: function.type_signature.clone(),
        });
    };
    match (parameter, &argument) {
        (Some(parameter), None) => {
            return Err(BuildError::MissingArgument {
                parameter: parameter.clone(),
            })
        }
        (Some(parameter), Some(argument))
            if !parameter.is_assignable_from(&argument.type_signature) =>
        {
            return Err(BuildError::ArgumentMismatch {
                parameter: parameter.clone(),
                argument: argument.type_signature.clone(),
            })
        }
        (None, Some(argument)) => {
            return Err(BuildError::UnexpectedArgument {
                argument: argument.type_signature.clone(),
            })
        }
        _ => {}
    }
    debug_assert_eq!(parameter.is_some(), argument.is_some());
    let ty = result.clone();
    Ok(finish(
        NodeKind::Call(Call {
            function: Box::new(function),
            argument: argument.map(Box::new),
        }),
        ty,
    ))
}

fn build_lambda(
    parameter_name: String,
    parameter_type: TypeSpec,
    result: Node,
) -> Result<Node, BuildError> {
    require_name("lambda", "parameter name", &parameter_name)?;
    let parameter_type = require_type("lambda", parameter_type)?;
    let ty = Type::function(Some(parameter_type.clone()), result.type_signature.clone());
    Ok(finish(
        NodeKind::Lambda(Lambda {
            parameter_name,
            parameter_type,
            result: Box::new(result),
        }),
        ty,
    ))
}

fn build_block(locals: Vec<(String, Node)>, result: Node) -> Result<Node, BuildError> {
    for (name, _) in &locals {
        require_name("block", "local name", name)?;
    }
    let ty = result.type_signature.clone();
    Ok(finish(
        NodeKind::Block(Block {
            locals,
            result: Box::new(result),
        }),
        ty,
    ))
}

fn build_leaf(node: &'static str, uri: &str, spec: TypeSpec) -> Result<Type, BuildError> {
    require_name(node, "URI", uri)?;
    require_type(node, spec)
}

fn build_compiled(proto: Computation, name: Option<String>) -> Result<Node, BuildError> {
    let ty = proto.deserialize_type()?;
    let name = name.unwrap_or_else(|| proto.default_name());
    Ok(finish(
        NodeKind::CompiledComputation(CompiledComputation { proto, name }),
        ty,
    ))
}

#[cfg(test)]
mod tests;
