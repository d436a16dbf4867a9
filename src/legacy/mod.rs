//! Version gating for prior container formats.
//!
//! The v1 wire format predates encoder groups and typed metadata. Its
//! decode logic lives outside this crate; the container reader only
//! gates on the version tag and hands v1 payloads to a [`LegacyLoader`]
//! when one is registered. The upgrade is one-way: writers always emit
//! the current version, so loading and re-writing a v1 file migrates it.

use std::io::Read;

use crate::recording::Recording;
use crate::util::Result;

/// Collaborator that decodes a version-1 payload into the current model.
///
/// The source is positioned just past the file's magic and version tag
/// and the loader must consume exactly the bytes of one recording tree.
pub trait LegacyLoader {
    /// Decode the v1 payload into a recording tree.
    fn load(&self, source: &mut dyn Read) -> Result<Recording>;
}
