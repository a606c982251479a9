//! Serialized computation payloads.
//!
//! A `Computation` is produced and validated outside this crate (by a
//! compiler back end). The IR only needs its embedded type descriptor and
//! a canonical byte form to derive a stable default name.

use std::hash::Hasher;

use fed_types::{deserialize_type, serialize_type, Type, TypeError};
use rustc_hash::FxHasher;

/// Opaque compiled computation with an embedded type descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Computation {
    type_descriptor: Vec<u8>,
    body: Vec<u8>,
}

impl Computation {
    /// Package `body` together with a descriptor of `ty`.
    pub fn new(ty: &Type, body: impl Into<Vec<u8>>) -> Result<Self, TypeError> {
        Ok(Computation {
            type_descriptor: serialize_type(ty)?,
            body: body.into(),
        })
    }

    /// Reassemble a payload from already-encoded parts.
    ///
    /// The descriptor is checked only when the payload becomes a node.
    pub fn from_parts(type_descriptor: Vec<u8>, body: Vec<u8>) -> Self {
        Computation {
            type_descriptor,
            body,
        }
    }

    pub fn type_descriptor(&self) -> &[u8] {
        &self.type_descriptor
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the embedded type descriptor.
    pub fn deserialize_type(&self) -> Result<Type, TypeError> {
        deserialize_type(&self.type_descriptor)
    }

    /// Deterministic byte encoding: each part prefixed by its little-endian
    /// `u64` length.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(16 + self.type_descriptor.len() + self.body.len());
        for part in [&self.type_descriptor, &self.body] {
            bytes.extend_from_slice(&(part.len() as u64).to_le_bytes());
            bytes.extend_from_slice(part);
        }
        bytes
    }

    /// Short debug label derived from [`Computation::canonical_bytes`].
    ///
    /// Lowercase hex of the low 32 bits of an `FxHasher` checksum. Not
    /// collision resistant; only good for naming.
    pub fn default_name(&self) -> String {
        let mut hasher = FxHasher::default();
        hasher.write(&self.canonical_bytes());
        format!("{:x}", hasher.finish() & 0xFFFF_FFFF)
    }
}
