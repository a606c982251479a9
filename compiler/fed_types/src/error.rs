//! Type-system errors.

/// Error raised while building, converting, or querying a type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeError {
    /// Two fields of one tuple share a name.
    DuplicateName { name: String },
    /// A field was given the empty string as its name.
    EmptyName { index: usize },
    /// Positional access past the end of a tuple.
    IndexOutOfRange { index: usize, len: usize },
    /// Name lookup for a field the tuple does not have.
    NoSuchField { name: String, available: Vec<String> },
    /// A named-tuple operation was applied to another kind of type.
    NotANamedTuple { found: String },
    /// A tuple element spec converted to no type at all.
    AbsentElement { index: usize },
    /// A binary type descriptor could not be encoded or decoded.
    Descriptor { reason: String },
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeError::DuplicateName { name } => {
                write!(f, "duplicate field name `{name}`")
            }
            TypeError::EmptyName { index } => {
                write!(f, "field {index} has an empty name")
            }
            TypeError::IndexOutOfRange { index, len } => {
                if *len == 0 {
                    write!(f, "index {index} is out of range for an empty tuple")
                } else {
                    write!(f, "index {index} is out of range 0..{len} of the tuple")
                }
            }
            TypeError::NoSuchField { name, available } => {
                write!(
                    f,
                    "no field named `{name}`; available fields: [{}]",
                    available.join(", ")
                )
            }
            TypeError::NotANamedTuple { found } => {
                write!(f, "expected a named tuple type, found `{found}`")
            }
            TypeError::AbsentElement { index } => {
                write!(f, "tuple element {index} has no type")
            }
            TypeError::Descriptor { reason } => {
                write!(f, "malformed type descriptor: {reason}")
            }
        }
    }
}

impl std::error::Error for TypeError {}
