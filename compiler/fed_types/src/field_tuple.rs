//! Ordered, optionally named fields.
//!
//! `FieldTuple<T>` is the shape shared by tuple values and named-tuple
//! types: an ordered sequence of `(name, value)` pairs where each name is
//! either absent or unique. Tuple nodes hold a `FieldTuple<Node>`, named
//! tuple types hold a `FieldTuple<Type>`.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::TypeError;

/// Ordered fields with optional unique names. Names are fixed once built.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FieldTuple<T> {
    elements: Vec<(Option<String>, T)>,
}

impl<T> FieldTuple<T> {
    /// Build from `(name, value)` pairs in order.
    ///
    /// Fails if a name is empty or if two elements share a name.
    pub fn new<I>(elements: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (Option<String>, T)>,
    {
        let elements: Vec<_> = elements.into_iter().collect();
        check_names(elements.iter().map(|(name, _)| name.as_deref()))?;
        Ok(FieldTuple { elements })
    }

    /// Build from values with no names. Cannot fail.
    pub fn unnamed<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        FieldTuple {
            elements: values.into_iter().map(|v| (None, v)).collect(),
        }
    }

    /// The tuple with no elements.
    pub fn empty() -> Self {
        FieldTuple {
            elements: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Result<&T, TypeError> {
        self.elements
            .get(index)
            .map(|(_, value)| value)
            .ok_or(TypeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Value of the field called `name`.
    pub fn get_named(&self, name: &str) -> Result<&T, TypeError> {
        self.index_of(name)
            .map(|index| &self.elements[index].1)
            .ok_or_else(|| TypeError::NoSuchField {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    /// Position of the field called `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.elements
            .iter()
            .position(|(n, _)| n.as_deref() == Some(name))
    }

    /// Name of the element at `index`; `None` when unnamed or out of range.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.elements.get(index).and_then(|(n, _)| n.as_deref())
    }

    /// Names of the named elements, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|(n, _)| n.as_deref())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Option<&str>, &T)> {
        self.elements.iter().map(|(n, v)| (n.as_deref(), v))
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &T> {
        self.elements.iter().map(|(_, v)| v)
    }

    /// Values in insertion order, mutably. Names cannot be changed.
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut T> {
        self.elements.iter_mut().map(|(_, v)| v)
    }

    /// Same names and order, values transformed by `f`.
    ///
    /// Names were already validated, so this cannot fail.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> FieldTuple<U> {
        FieldTuple {
            elements: self
                .elements
                .iter()
                .map(|(n, v)| (n.clone(), f(v)))
                .collect(),
        }
    }

    /// Consume into the underlying `(name, value)` pairs.
    pub fn into_elements(self) -> Vec<(Option<String>, T)> {
        self.elements
    }
}

fn check_names<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Result<(), TypeError> {
    let mut seen = FxHashSet::default();
    for (index, name) in names.enumerate() {
        let Some(name) = name else { continue };
        if name.is_empty() {
            return Err(TypeError::EmptyName { index });
        }
        if !seen.insert(name) {
            return Err(TypeError::DuplicateName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

impl<T> Default for FieldTuple<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Renders as `<a=1, 2>`; unnamed elements appear bare.
impl<T: fmt::Display> fmt::Display for FieldTuple<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match name {
                Some(name) => write!(f, "{name}={value}")?,
                None => write!(f, "{value}")?,
            }
        }
        f.write_str(">")
    }
}
