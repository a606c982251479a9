//! Permissive type specifications and their conversion to [`Type`].
//!
//! Builders accept anything convertible into a [`TypeSpec`]: a finished
//! `Type`, a bare `DType`, a `(DType, shape)` pair, or a list of named and
//! unnamed element specs. [`to_type`] is the single place where such input
//! is checked and normalized.

use crate::{DType, Dim, FieldTuple, Type, TypeError};

/// Something that can be normalized into a type, or the absence of one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeSpec {
    /// No type supplied.
    Absent,
    Type(Type),
    /// Scalar tensor of this dtype.
    DType(DType),
    /// Tensor of this dtype and shape.
    Tensor(DType, Vec<Dim>),
    /// Named tuple; elements may be unnamed.
    Fields(Vec<(Option<String>, TypeSpec)>),
}

impl TypeSpec {
    /// Spec for a named tuple from `(name, spec)` pairs.
    pub fn fields<N, S, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<Option<String>>,
        S: Into<TypeSpec>,
    {
        TypeSpec::Fields(
            fields
                .into_iter()
                .map(|(n, s)| (n.into(), s.into()))
                .collect(),
        )
    }

    /// Spec for a tuple of unnamed elements.
    pub fn unnamed<S, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TypeSpec>,
    {
        TypeSpec::Fields(elements.into_iter().map(|s| (None, s.into())).collect())
    }
}

impl From<Type> for TypeSpec {
    fn from(ty: Type) -> Self {
        TypeSpec::Type(ty)
    }
}

impl From<&Type> for TypeSpec {
    fn from(ty: &Type) -> Self {
        TypeSpec::Type(ty.clone())
    }
}

impl From<Option<Type>> for TypeSpec {
    fn from(ty: Option<Type>) -> Self {
        ty.map_or(TypeSpec::Absent, TypeSpec::Type)
    }
}

impl From<DType> for TypeSpec {
    fn from(dtype: DType) -> Self {
        TypeSpec::DType(dtype)
    }
}

impl<const N: usize> From<(DType, [Dim; N])> for TypeSpec {
    fn from((dtype, shape): (DType, [Dim; N])) -> Self {
        TypeSpec::Tensor(dtype, shape.to_vec())
    }
}

impl From<(DType, Vec<Dim>)> for TypeSpec {
    fn from((dtype, shape): (DType, Vec<Dim>)) -> Self {
        TypeSpec::Tensor(dtype, shape)
    }
}

/// Normalize `spec` into a type.
///
/// Returns `Ok(None)` for [`TypeSpec::Absent`]. Nested tuple elements must
/// not be absent and tuple names must be unique and non-empty.
#[tracing::instrument(level = "trace", skip_all)]
pub fn to_type(spec: impl Into<TypeSpec>) -> Result<Option<Type>, TypeError> {
    convert(spec.into())
}

fn convert(spec: TypeSpec) -> Result<Option<Type>, TypeError> {
    fed_stack::ensure_sufficient_stack(|| match spec {
        TypeSpec::Absent => Ok(None),
        TypeSpec::Type(ty) => Ok(Some(ty)),
        TypeSpec::DType(dtype) => Ok(Some(Type::tensor(dtype))),
        TypeSpec::Tensor(dtype, shape) => Ok(Some(Type::tensor_with_shape(dtype, shape))),
        TypeSpec::Fields(fields) => {
            let mut converted = Vec::with_capacity(fields.len());
            for (index, (name, element)) in fields.into_iter().enumerate() {
                let ty = convert(element)?.ok_or(TypeError::AbsentElement { index })?;
                converted.push((name, ty));
            }
            FieldTuple::new(converted).map(|fields| Some(Type::from(fields)))
        }
    })
}
