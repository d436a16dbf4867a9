//! Container reader.
//!
//! Mirrors the writer exactly: magic and version tag, then one recursive
//! node frame. Every level is length- or count-prefixed, so the reader
//! consumes precisely the bytes the writer emitted and reports that
//! total alongside the decoded tree.

use std::io::Read;

use log::debug;

use super::format::{CURRENT_VERSION, LEGACY_VERSION, MAGIC};
use crate::binary::{self, CountingReader};
use crate::encoding::{default_encoders, Encoder};
use crate::legacy::LegacyLoader;
use crate::metadata::Block;
use crate::recording::{BinaryReference, Recording};
use crate::util::{Error, Result};

/// Deserializes recording trees from a byte source.
pub struct Reader<R: Read> {
    encoders: Vec<Box<dyn Encoder>>,
    source: R,
    legacy: Option<Box<dyn LegacyLoader>>,
}

impl<R: Read> Reader<R> {
    /// Create a reader dispatching to the given encoders.
    pub fn new(encoders: Vec<Box<dyn Encoder>>, source: R) -> Self {
        Self {
            encoders,
            source,
            legacy: None,
        }
    }

    /// Create a reader with the standard encoder set.
    pub fn with_default_encoders(source: R) -> Self {
        Self::new(default_encoders(), source)
    }

    /// Register a loader for version-1 payloads.
    pub fn with_legacy_loader(mut self, loader: Box<dyn LegacyLoader>) -> Self {
        self.legacy = Some(loader);
        self
    }

    /// Read one recording tree, returning it with the bytes consumed.
    pub fn read(&mut self) -> Result<(Recording, u64)> {
        let mut src = CountingReader::new(&mut self.source);

        let mut magic = [0u8; 4];
        binary::fill(&mut src, &mut magic)?;
        if &magic != MAGIC {
            return Err(Error::InvalidMagic);
        }

        let version = binary::read_uvarint(&mut src)?;
        let recording = match version {
            CURRENT_VERSION => read_node(&self.encoders, &mut src)?,
            LEGACY_VERSION => match &self.legacy {
                Some(loader) => loader.load(&mut src)?,
                None => {
                    return Err(Error::UnsupportedVersion {
                        signature: "container".to_string(),
                        version,
                    })
                }
            },
            other => {
                return Err(Error::UnsupportedVersion {
                    signature: "container".to_string(),
                    version: other,
                })
            }
        };

        let count = src.count();
        debug!("read recording {:?}: {count} bytes", recording.name());
        Ok((recording, count))
    }
}

fn read_node<R: Read>(encoders: &[Box<dyn Encoder>], r: &mut R) -> Result<Recording> {
    let id = binary::read_string(r)?;
    let name = binary::read_string(r)?;
    let metadata = Block::decode(r)?;

    let group_count = binary::read_uvarint(r)?;
    let mut collections = Vec::new();
    for _ in 0..group_count {
        let signature = binary::read_string(r)?;
        let version = binary::read_uvarint(r)?;

        let header_len = binary::read_uvarint(r)? as usize;
        let mut header = vec![0u8; header_len];
        binary::fill(r, &mut header)?;

        let encoder = encoders
            .iter()
            .find(|e| e.signature() == signature)
            .ok_or_else(|| Error::NoEncoderFor(signature.clone()))?;
        if version > u64::from(encoder.version()) {
            return Err(Error::UnsupportedVersion { signature, version });
        }

        let stream_count = binary::read_uvarint(r)?;
        for _ in 0..stream_count {
            let body_len = binary::read_uvarint(r)? as usize;
            let mut body = vec![0u8; body_len];
            binary::fill(r, &mut body)?;
            collections.push(encoder.decode(&header, &body)?);
        }
    }

    let reference_count = binary::read_uvarint(r)?;
    let mut references = Vec::with_capacity(reference_count.min(4096) as usize);
    for _ in 0..reference_count {
        let ref_name = binary::read_string(r)?;
        let uri = binary::read_string(r)?;
        let size = binary::read_uvarint(r)?;
        let ref_metadata = Block::decode(r)?;
        references.push(BinaryReference::new(ref_name, uri, size, ref_metadata));
    }

    let child_count = binary::read_uvarint(r)?;
    let mut children = Vec::with_capacity(child_count.min(4096) as usize);
    for _ in 0..child_count {
        children.push(read_node(encoders, r)?);
    }

    Ok(Recording::new(id, name)
        .with_metadata(metadata)
        .with_collections(collections)
        .with_children(children)
        .with_references(references))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Writer;

    #[test]
    fn test_rejects_bad_magic() {
        let mut reader = Reader::with_default_encoders(&b"NOPE\x02"[..]);
        assert!(matches!(reader.read(), Err(Error::InvalidMagic)));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let mut reader = Reader::with_default_encoders(&b"RA"[..]);
        assert!(matches!(reader.read(), Err(Error::TruncatedInput)));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut reader = Reader::with_default_encoders(&b"RAP\x00\x09"[..]);
        match reader.read() {
            Err(Error::UnsupportedVersion { signature, version }) => {
                assert_eq!(signature, "container");
                assert_eq!(version, 9);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_legacy_version_without_loader() {
        let mut reader = Reader::with_default_encoders(&b"RAP\x00\x01"[..]);
        assert!(matches!(
            reader.read(),
            Err(Error::UnsupportedVersion { version: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_newer_group_version() {
        // Write a tree, then bump the recorded group version byte.
        let mut sink = Vec::new();
        let mut writer = Writer::with_default_encoders(&mut sink);
        let rec = Recording::new("", "r").with_collections(vec![
            crate::capture::position::Collection::new(
                "Position",
                vec![crate::capture::position::Capture::new(1.0, 2.0, 3.0, 4.0)],
            )
            .into(),
        ]);
        writer.write(&rec).unwrap();

        let marker = b"recolude.position";
        let at = sink
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap();
        sink[at + marker.len()] = 9; // version uvarint follows the signature

        let mut reader = Reader::with_default_encoders(sink.as_slice());
        assert!(matches!(
            reader.read(),
            Err(Error::UnsupportedVersion { version: 9, .. })
        ));
    }
}
