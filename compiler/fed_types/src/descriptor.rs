//! Binary type descriptors.
//!
//! Compiled computations carry their type as an embedded descriptor so a
//! payload can be handed around without the tree it was built from.
//!
//! A descriptor is the bincode encoding of the type's constructors in
//! post-order: each compound entry takes its children from the entries
//! just before it. Encoding and decoding are both loops over that flat
//! list, so arbitrarily nested types never recurse.

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::{DType, Dim, PlacementLiteral, Type, TypeError};

/// Upper bound on the encoded size of one descriptor (16MB).
const DESCRIPTOR_LIMIT: u64 = 16 * 1024 * 1024;

/// One type constructor.
#[derive(Debug, Serialize, Deserialize)]
enum Entry {
    Tensor { dtype: DType, shape: Vec<Dim> },
    /// Field names; the values are the preceding `len` types.
    NamedTuple(Vec<Option<String>>),
    Sequence,
    /// Preceded by the parameter (if any) and then the result.
    Function { has_parameter: bool },
    Abstract(String),
    Placement,
    Federated {
        placement: PlacementLiteral,
        all_equal: bool,
    },
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .with_limit(DESCRIPTOR_LIMIT)
}

/// Encode `ty` as a bincode descriptor.
pub fn serialize_type(ty: &Type) -> Result<Vec<u8>, TypeError> {
    options()
        .serialize(&flatten(ty))
        .map_err(|e| malformed(format!("failed to serialize type: {e}")))
}

/// Decode a descriptor produced by [`serialize_type`].
///
/// Trailing bytes, oversized input and entry lists that do not describe
/// exactly one type are all rejected.
pub fn deserialize_type(bytes: &[u8]) -> Result<Type, TypeError> {
    let entries: Vec<Entry> = options()
        .deserialize(bytes)
        .map_err(|e| malformed(format!("failed to deserialize type: {e}")))?;
    rebuild(entries)
}

fn malformed(reason: impl Into<String>) -> TypeError {
    TypeError::Descriptor {
        reason: reason.into(),
    }
}

fn flatten(ty: &Type) -> Vec<Entry> {
    enum Step<'a> {
        Enter(&'a Type),
        Emit(Entry),
    }

    let mut entries = Vec::new();
    let mut steps = vec![Step::Enter(ty)];
    while let Some(step) = steps.pop() {
        let ty = match step {
            Step::Emit(entry) => {
                entries.push(entry);
                continue;
            }
            Step::Enter(ty) => ty,
        };
        match ty {
            Type::Tensor { dtype, shape } => entries.push(Entry::Tensor {
                dtype: *dtype,
                shape: shape.clone(),
            }),
            Type::NamedTuple(fields) => {
                let names = fields.iter().map(|(n, _)| n.map(str::to_string)).collect();
                steps.push(Step::Emit(Entry::NamedTuple(names)));
                let values: Vec<&Type> = fields.values().collect();
                steps.extend(values.into_iter().rev().map(Step::Enter));
            }
            Type::Sequence(element) => {
                steps.push(Step::Emit(Entry::Sequence));
                steps.push(Step::Enter(element.as_ref()));
            }
            Type::Function { parameter, result } => {
                steps.push(Step::Emit(Entry::Function {
                    has_parameter: parameter.is_some(),
                }));
                steps.push(Step::Enter(result.as_ref()));
                steps.extend(parameter.as_deref().map(Step::Enter));
            }
            Type::Abstract(label) => entries.push(Entry::Abstract(label.clone())),
            Type::Placement => entries.push(Entry::Placement),
            Type::Federated {
                member,
                placement,
                all_equal,
            } => {
                steps.push(Step::Emit(Entry::Federated {
                    placement: *placement,
                    all_equal: *all_equal,
                }));
                steps.push(Step::Enter(member.as_ref()));
            }
        }
    }
    entries
}

fn rebuild(entries: Vec<Entry>) -> Result<Type, TypeError> {
    let mut built: Vec<Type> = Vec::new();
    for entry in entries {
        let ty = match entry {
            Entry::Tensor { dtype, shape } => Type::Tensor { dtype, shape },
            Entry::NamedTuple(names) => {
                let start = built
                    .len()
                    .checked_sub(names.len())
                    .ok_or_else(|| malformed("named tuple is missing elements"))?;
                let values = built.split_off(start);
                Type::named_tuple(names.into_iter().zip(values))
                    .map_err(|e| malformed(format!("invalid named tuple: {e}")))?
            }
            Entry::Sequence => Type::sequence(pop(&mut built)?),
            Entry::Function { has_parameter } => {
                let result = pop(&mut built)?;
                let parameter = if has_parameter {
                    Some(pop(&mut built)?)
                } else {
                    None
                };
                Type::function(parameter, result)
            }
            Entry::Abstract(label) => Type::Abstract(label),
            Entry::Placement => Type::Placement,
            Entry::Federated {
                placement,
                all_equal,
            } => Type::federated(pop(&mut built)?, placement, all_equal),
        };
        built.push(ty);
    }
    let ty = pop(&mut built)?;
    if built.is_empty() {
        Ok(ty)
    } else {
        Err(malformed(format!(
            "expected one type, found {} more",
            built.len()
        )))
    }
}

fn pop(built: &mut Vec<Type>) -> Result<Type, TypeError> {
    built
        .pop()
        .ok_or_else(|| malformed("entry is missing an operand"))
}
