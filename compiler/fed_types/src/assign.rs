//! Assignability between structural types.
//!
//! `target.is_assignable_from(source)` answers whether a value of type
//! `source` may be supplied where `target` is expected. The relation is
//! reflexive and transitive but not symmetric: an unknown dimension or an
//! absent field name on the target side accepts anything.

use fed_stack::ensure_sufficient_stack;

use crate::{FieldTuple, Type};

impl Type {
    /// Whether a value of type `source` can be used where `self` is expected.
    pub fn is_assignable_from(&self, source: &Type) -> bool {
        ensure_sufficient_stack(|| match (self, source) {
            (
                Type::Tensor { dtype, shape },
                Type::Tensor {
                    dtype: src_dtype,
                    shape: src_shape,
                },
            ) => {
                dtype == src_dtype
                    && shape.len() == src_shape.len()
                    && shape.iter().zip(src_shape).all(|(t, s)| t.accepts(*s))
            }

            (Type::NamedTuple(target), Type::NamedTuple(source)) => {
                fields_assignable(target, source)
            }

            (Type::Sequence(target), Type::Sequence(source)) => target.is_assignable_from(source),

            (
                Type::Function { parameter, result },
                Type::Function {
                    parameter: src_parameter,
                    result: src_result,
                },
            ) => {
                let parameters_ok = match (parameter, src_parameter) {
                    (None, None) => true,
                    // Contravariant: the source must accept everything the target accepts.
                    (Some(target), Some(source)) => source.is_assignable_from(target),
                    _ => false,
                };
                parameters_ok && result.is_assignable_from(src_result)
            }

            (Type::Abstract(label), Type::Abstract(src_label)) => label == src_label,

            (Type::Placement, Type::Placement) => true,

            (
                Type::Federated {
                    member,
                    placement,
                    all_equal,
                },
                Type::Federated {
                    member: src_member,
                    placement: src_placement,
                    all_equal: src_all_equal,
                },
            ) => {
                placement == src_placement
                    && (!*all_equal || *src_all_equal)
                    && member.is_assignable_from(src_member)
            }

            _ => false,
        })
    }

    /// Mutual assignability.
    pub fn is_equivalent_to(&self, other: &Type) -> bool {
        self.is_assignable_from(other) && other.is_assignable_from(self)
    }
}

fn fields_assignable(target: &FieldTuple<Type>, source: &FieldTuple<Type>) -> bool {
    target.len() == source.len()
        && target
            .iter()
            .zip(source.iter())
            .all(|((name, ty), (src_name, src_ty))| {
                (name.is_none() || name == src_name) && ty.is_assignable_from(src_ty)
            })
}

#[cfg(test)]
mod tests;
