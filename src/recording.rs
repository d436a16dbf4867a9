//! The recording tree.
//!
//! A recording is a named node carrying typed metadata, capture
//! collections, external-blob references, and child recordings. Nodes
//! form a finite tree; identity strings are opaque and may be empty.

use crate::capture::CaptureCollection;
use crate::metadata::Block;

/// A node in a recording tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    id: String,
    name: String,
    metadata: Block,
    collections: Vec<CaptureCollection>,
    children: Vec<Recording>,
    references: Vec<BinaryReference>,
}

impl Recording {
    /// Create a recording with the given identity and no content.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach capture collections.
    pub fn with_collections(mut self, collections: Vec<CaptureCollection>) -> Self {
        self.collections = collections;
        self
    }

    /// Attach child recordings.
    pub fn with_children(mut self, children: Vec<Recording>) -> Self {
        self.children = children;
        self
    }

    /// Attach a metadata block.
    pub fn with_metadata(mut self, metadata: Block) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach binary references.
    pub fn with_references(mut self, references: Vec<BinaryReference>) -> Self {
        self.references = references;
        self
    }

    /// Opaque identity string; not required unique.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node metadata.
    pub fn metadata(&self) -> &Block {
        &self.metadata
    }

    /// Capture collections attached to this node.
    pub fn collections(&self) -> &[CaptureCollection] {
        &self.collections
    }

    /// Child recordings.
    pub fn children(&self) -> &[Recording] {
        &self.children
    }

    /// External-blob references attached to this node.
    pub fn references(&self) -> &[BinaryReference] {
        &self.references
    }
}

/// Descriptor of an external blob stored outside the container.
///
/// Only the descriptor is serialized; fetching the referenced bytes is
/// the consumer's problem and the URI scheme is not interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryReference {
    name: String,
    uri: String,
    size: u64,
    metadata: Block,
}

impl BinaryReference {
    /// Create a reference descriptor.
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        size: u64,
        metadata: Block,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            size,
            metadata,
        }
    }

    /// Reference name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque location of the referenced bytes.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Size of the referenced blob in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reference metadata.
    pub fn metadata(&self) -> &Block {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::position;
    use crate::metadata::Property;

    #[test]
    fn test_builder() {
        let rec = Recording::new("44", "Test Recording")
            .with_metadata(Block::from_entries([("a", Property::from("bee"))]))
            .with_collections(vec![position::Collection::new(
                "Position",
                vec![position::Capture::new(1.0, 1.0, 2.0, 3.0)],
            )
            .into()])
            .with_children(vec![Recording::new("", "child")]);

        assert_eq!(rec.id(), "44");
        assert_eq!(rec.name(), "Test Recording");
        assert_eq!(rec.collections().len(), 1);
        assert_eq!(rec.children().len(), 1);
        assert_eq!(rec.metadata().len(), 1);
    }
}
