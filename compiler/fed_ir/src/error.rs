//! Construction errors.
//!
//! Every constructor validates its inputs before a node exists, so a
//! `BuildError` always means no node was produced.

use fed_types::{Type, TypeError};

/// Broad category of a construction failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// An input of the wrong category: a child that is not a function or
    /// tuple, a missing required type, an argument where none is allowed.
    InvalidArgument,
    /// An input of the right category with a bad value: empty names,
    /// out-of-range indices, duplicate field names.
    InvalidValue,
    /// A child's type fails the enclosing node's compatibility rule.
    IncompatibleType,
}

/// Why a node could not be constructed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A node that must carry a type was given none.
    MissingType { node: &'static str },
    /// A name or URI that must be non-empty was empty.
    EmptyName {
        node: &'static str,
        what: &'static str,
    },
    /// Selection source is not a named tuple.
    NotANamedTuple { found: Type },
    /// Selection by a name the source type does not have.
    NoSuchField { name: String, source_type: Type },
    /// Selection by an index past the end of the source type.
    IndexOutOfRange { index: usize, len: usize },
    /// Call target is not a function.
    NotAFunction { found: Type },
    /// The function takes a parameter but no argument was supplied.
    MissingArgument { parameter: Type },
    /// The function takes no parameter but an argument was supplied.
    UnexpectedArgument { argument: Type },
    /// The argument type is not assignable to the parameter type.
    ArgumentMismatch { parameter: Type, argument: Type },
    /// Failure reported by the type system.
    Type(TypeError),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::MissingType { .. }
            | BuildError::NotANamedTuple { .. }
            | BuildError::NotAFunction { .. }
            | BuildError::MissingArgument { .. }
            | BuildError::UnexpectedArgument { .. } => ErrorKind::InvalidArgument,

            BuildError::EmptyName { .. } | BuildError::IndexOutOfRange { .. } => {
                ErrorKind::InvalidValue
            }

            BuildError::NoSuchField { .. } | BuildError::ArgumentMismatch { .. } => {
                ErrorKind::IncompatibleType
            }

            BuildError::Type(err) => match err {
                TypeError::DuplicateName { .. }
                | TypeError::EmptyName { .. }
                | TypeError::IndexOutOfRange { .. }
                | TypeError::Descriptor { .. } => ErrorKind::InvalidValue,
                TypeError::NoSuchField { .. } => ErrorKind::IncompatibleType,
                TypeError::NotANamedTuple { .. } | TypeError::AbsentElement { .. } => {
                    ErrorKind::InvalidArgument
                }
            },
        }
    }
}

impl From<TypeError> for BuildError {
    fn from(err: TypeError) -> Self {
        BuildError::Type(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::MissingType { node } => {
                write!(f, "{node} cannot be created without a type")
            }
            BuildError::EmptyName { node, what } => {
                write!(f, "the {what} of a {node} cannot be empty")
            }
            BuildError::NotANamedTuple { found } => write!(
                f,
                "expected the source of a selection to be a named tuple, found `{found}`"
            ),
            BuildError::NoSuchField { name, source_type } => write!(
                f,
                "there is no element named `{name}` in `{source_type}`"
            ),
            BuildError::IndexOutOfRange { index, len } => {
                if *len == 0 {
                    write!(
                        f,
                        "cannot select index {index} from a tuple with no elements"
                    )
                } else {
                    write!(
                        f,
                        "the selected index {index} does not fit into the valid range 0..{len}"
                    )
                }
            }
            BuildError::NotAFunction { found } => write!(
                f,
                "expected the called value to be of a function type, found `{found}`"
            ),
            BuildError::MissingArgument { parameter } => write!(
                f,
                "the invoked function expects an argument of type `{parameter}`, but got none"
            ),
            BuildError::UnexpectedArgument { argument } => write!(
                f,
                "the invoked function takes no parameter, but got an argument of type `{argument}`"
            ),
            BuildError::ArgumentMismatch {
                parameter,
                argument,
            } => write!(
                f,
                "the function parameter is of type `{parameter}`, \
                 but the argument is of the incompatible type `{argument}`"
            ),
            BuildError::Type(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Type(err) => Some(err),
            _ => None,
        }
    }
}
