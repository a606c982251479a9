//! Structural type representation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use fed_stack::ensure_sufficient_stack;
use serde::{Deserialize, Serialize};

use crate::{DType, Dim, FieldTuple, PlacementLiteral, TypeError};

/// A structural type.
///
/// Types are plain values: two types are interchangeable when
/// [`Type::is_assignable_from`] holds both ways, regardless of identity.
/// Nested types sit behind `Arc`, so cloning is shallow and a type built
/// from a child's type shares it instead of copying it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Type {
    /// Tensor of `dtype` with the given shape; empty shape is a scalar.
    Tensor { dtype: DType, shape: Vec<Dim> },

    /// Ordered, optionally named fields.
    NamedTuple(Arc<FieldTuple<Type>>),

    /// Sequence of elements of one type.
    Sequence(Arc<Type>),

    /// Function with an optional parameter.
    Function {
        parameter: Option<Arc<Type>>,
        result: Arc<Type>,
    },

    /// Type variable, identified by its label.
    Abstract(String),

    /// The type of placement literals.
    Placement,

    /// A value placed at `placement`.
    Federated {
        member: Arc<Type>,
        placement: PlacementLiteral,
        /// Whether all members hold the same value.
        all_equal: bool,
    },
}

impl Type {
    /// Scalar tensor.
    pub fn tensor(dtype: DType) -> Self {
        Type::Tensor {
            dtype,
            shape: Vec::new(),
        }
    }

    pub fn tensor_with_shape(dtype: DType, shape: impl IntoIterator<Item = Dim>) -> Self {
        Type::Tensor {
            dtype,
            shape: shape.into_iter().collect(),
        }
    }

    /// Named tuple from `(name, type)` pairs; fails on duplicate or empty names.
    pub fn named_tuple<I>(fields: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (Option<String>, Type)>,
    {
        FieldTuple::new(fields).map(Type::from)
    }

    /// Named tuple whose elements are all unnamed.
    pub fn unnamed_tuple(types: impl IntoIterator<Item = Type>) -> Self {
        Type::from(FieldTuple::unnamed(types))
    }

    pub fn sequence(element: Type) -> Self {
        Type::Sequence(Arc::new(element))
    }

    pub fn function(parameter: Option<Type>, result: Type) -> Self {
        Type::Function {
            parameter: parameter.map(Arc::new),
            result: Arc::new(result),
        }
    }

    pub fn abstract_type(label: impl Into<String>) -> Self {
        Type::Abstract(label.into())
    }

    pub fn federated(member: Type, placement: PlacementLiteral, all_equal: bool) -> Self {
        Type::Federated {
            member: Arc::new(member),
            placement,
            all_equal,
        }
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    #[inline]
    pub fn is_named_tuple(&self) -> bool {
        matches!(self, Type::NamedTuple(_))
    }

    /// Fields of a named tuple type.
    pub fn as_named_tuple(&self) -> Option<&FieldTuple<Type>> {
        match self {
            Type::NamedTuple(fields) => Some(&**fields),
            _ => None,
        }
    }

    /// `(parameter, result)` of a function type.
    pub fn as_function(&self) -> Option<(Option<&Type>, &Type)> {
        match self {
            Type::Function { parameter, result } => Some((parameter.as_deref(), &**result)),
            _ => None,
        }
    }

    /// Type of the field `name` of a named tuple type.
    pub fn element_type(&self, name: &str) -> Result<&Type, TypeError> {
        self.named_fields()?.get_named(name)
    }

    /// Type of the element at `index` of a named tuple type.
    pub fn element_type_at(&self, index: usize) -> Result<&Type, TypeError> {
        self.named_fields()?.get(index)
    }

    fn named_fields(&self) -> Result<&FieldTuple<Type>, TypeError> {
        self.as_named_tuple().ok_or_else(|| TypeError::NotANamedTuple {
            found: self.to_string(),
        })
    }

    /// Constructor-shaped structural form, e.g.
    /// `NamedTupleType([('a', TensorType(int32))])`.
    pub fn repr(&self) -> String {
        let mut buf = String::new();
        self.repr_into(&mut buf);
        buf
    }

    /// Append [`Type::repr`] to `buf`.
    pub fn repr_into(&self, buf: &mut String) {
        ensure_sufficient_stack(|| match self {
            Type::Tensor { dtype, shape } => {
                buf.push_str("TensorType(");
                buf.push_str(dtype.name());
                if !shape.is_empty() {
                    buf.push_str(", [");
                    push_joined(buf, shape.iter().map(ToString::to_string), ", ");
                    buf.push(']');
                }
                buf.push(')');
            }
            Type::NamedTuple(fields) => {
                buf.push_str("NamedTupleType([");
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push('(');
                    match name {
                        Some(name) => push_quoted(buf, name),
                        None => buf.push_str("None"),
                    }
                    buf.push_str(", ");
                    ty.repr_into(buf);
                    buf.push(')');
                }
                buf.push_str("])");
            }
            Type::Sequence(element) => {
                buf.push_str("SequenceType(");
                element.repr_into(buf);
                buf.push(')');
            }
            Type::Function { parameter, result } => {
                buf.push_str("FunctionType(");
                match parameter {
                    Some(parameter) => parameter.repr_into(buf),
                    None => buf.push_str("None"),
                }
                buf.push_str(", ");
                result.repr_into(buf);
                buf.push(')');
            }
            Type::Abstract(label) => {
                buf.push_str("AbstractType(");
                push_quoted(buf, label);
                buf.push(')');
            }
            Type::Placement => buf.push_str("PlacementType()"),
            Type::Federated {
                member,
                placement,
                all_equal,
            } => {
                buf.push_str("FederatedType(");
                member.repr_into(buf);
                buf.push_str(", ");
                buf.push_str(placement.name());
                buf.push_str(if *all_equal { ", True)" } else { ", False)" });
            }
        });
    }
}

/// Append `text` to `buf` as a single-quoted literal, escaping `'` and `\`.
pub fn push_quoted(buf: &mut String, text: &str) {
    buf.push('\'');
    for c in text.chars() {
        if matches!(c, '\'' | '\\') {
            buf.push('\\');
        }
        buf.push(c);
    }
    buf.push('\'');
}

fn push_joined(buf: &mut String, items: impl Iterator<Item = String>, sep: &str) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            buf.push_str(sep);
        }
        buf.push_str(&item);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Type::Tensor { dtype, shape } => {
                write!(f, "{dtype}")?;
                if shape.is_empty() {
                    return Ok(());
                }
                f.write_str("[")?;
                for (i, dim) in shape.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{dim}")?;
                }
                f.write_str("]")
            }
            Type::NamedTuple(fields) => write!(f, "{fields}"),
            Type::Sequence(element) => write!(f, "{element}*"),
            Type::Function { parameter, result } => match parameter {
                Some(parameter) => write!(f, "({parameter} -> {result})"),
                None => write!(f, "( -> {result})"),
            },
            Type::Abstract(label) => f.write_str(label),
            Type::Placement => f.write_str("placement"),
            Type::Federated {
                member,
                placement,
                all_equal,
            } => {
                if *all_equal {
                    write!(f, "{member}@{placement}")
                } else {
                    write!(f, "{{{member}}}@{placement}")
                }
            }
        })
    }
}

impl From<FieldTuple<Type>> for Type {
    fn from(fields: FieldTuple<Type>) -> Self {
        Type::NamedTuple(Arc::new(fields))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (
                Type::Tensor { dtype, shape },
                Type::Tensor {
                    dtype: other_dtype,
                    shape: other_shape,
                },
            ) => dtype == other_dtype && shape == other_shape,
            (Type::NamedTuple(fields), Type::NamedTuple(other_fields)) => fields == other_fields,
            (Type::Sequence(element), Type::Sequence(other_element)) => element == other_element,
            (
                Type::Function { parameter, result },
                Type::Function {
                    parameter: other_parameter,
                    result: other_result,
                },
            ) => parameter == other_parameter && result == other_result,
            (Type::Abstract(label), Type::Abstract(other_label)) => label == other_label,
            (Type::Placement, Type::Placement) => true,
            (
                Type::Federated {
                    member,
                    placement,
                    all_equal,
                },
                Type::Federated {
                    member: other_member,
                    placement: other_placement,
                    all_equal: other_all_equal,
                },
            ) => {
                placement == other_placement
                    && all_equal == other_all_equal
                    && member == other_member
            }
            _ => false,
        })
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ensure_sufficient_stack(|| {
            std::mem::discriminant(self).hash(state);
            match self {
                Type::Tensor { dtype, shape } => {
                    dtype.hash(state);
                    shape.hash(state);
                }
                Type::NamedTuple(fields) => fields.hash(state),
                Type::Sequence(element) => element.hash(state),
                Type::Function { parameter, result } => {
                    parameter.hash(state);
                    result.hash(state);
                }
                Type::Abstract(label) => label.hash(state),
                Type::Placement => {}
                Type::Federated {
                    member,
                    placement,
                    all_equal,
                } => {
                    member.hash(state);
                    placement.hash(state);
                    all_equal.hash(state);
                }
            }
        });
    }
}

/// Frees nested types with a worklist instead of recursion.
///
/// Uniquely owned compound children are moved out and replaced by
/// `Placement` before their holder is released; shared children are
/// released by whoever drops the last handle.
impl Drop for Type {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut ty) = pending.pop() {
            ty.detach_children(&mut pending);
        }
    }
}

impl Type {
    fn detach_children(&mut self, pending: &mut Vec<Type>) {
        match self {
            Type::NamedTuple(fields) => {
                if let Some(fields) = Arc::get_mut(fields) {
                    for ty in fields.values_mut() {
                        detach(ty, pending);
                    }
                }
            }
            Type::Sequence(child) | Type::Federated { member: child, .. } => {
                detach_shared(child, pending);
            }
            Type::Function { parameter, result } => {
                if let Some(parameter) = parameter {
                    detach_shared(parameter, pending);
                }
                detach_shared(result, pending);
            }
            Type::Tensor { .. } | Type::Abstract(_) | Type::Placement => {}
        }
    }
}

fn detach_shared(child: &mut Arc<Type>, pending: &mut Vec<Type>) {
    if let Some(child) = Arc::get_mut(child) {
        detach(child, pending);
    }
}

fn detach(child: &mut Type, pending: &mut Vec<Type>) {
    if !matches!(child, Type::Tensor { .. } | Type::Abstract(_) | Type::Placement) {
        pending.push(std::mem::replace(child, Type::Placement));
    }
}
