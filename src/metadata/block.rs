//! Metadata block codec.
//!
//! A block maps string keys to typed [`Property`] values. On the wire it
//! is a uvarint entry count followed by key string, property code, and
//! property payload per entry. Keys are emitted in sorted order so the
//! same block always produces the same bytes.

use std::collections::BTreeMap;
use std::io::Read;

use super::Property;
use crate::binary;
use crate::util::{Error, Result};

/// Maximum number of nested blocks tolerated during decode.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A key to typed-property mapping attached to recordings, binary
/// references, and (nested) other blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    mapping: BTreeMap<String, Property>,
}

impl Block {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from key/property pairs.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Property)>,
    {
        Self {
            mapping: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// Insert a property, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Property) {
        self.mapping.insert(key.into(), value);
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.mapping.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Check if the block has no entries.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.mapping.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append the encoded block to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        binary::push_uvarint(out, self.mapping.len() as u64);
        for (key, prop) in &self.mapping {
            binary::push_string(out, key);
            out.push(prop.code());
            prop.encode_payload(out);
        }
    }

    /// Encode the block to a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    /// Decode a block from a source.
    pub fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        Self::decode_at_depth(r, 0)
    }

    pub(crate) fn decode_at_depth<R: Read + ?Sized>(r: &mut R, depth: usize) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::metadata(format!(
                "blocks nested deeper than {MAX_NESTING_DEPTH}"
            )));
        }

        let count = binary::read_uvarint(r)?;
        let mut mapping = BTreeMap::new();
        for _ in 0..count {
            let key = binary::read_string(r)?;
            let code = binary::read_u8(r)?;
            let prop = Property::decode_payload(code, r, depth)?;
            mapping.insert(key, prop);
        }
        Ok(Self { mapping })
    }
}

impl<K: Into<String>> FromIterator<(K, Property)> for Block {
    fn from_iter<T: IntoIterator<Item = (K, Property)>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}
