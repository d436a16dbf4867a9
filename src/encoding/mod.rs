//! Capture stream codecs.
//!
//! Every codec implements [`Encoder`]: it owns one signature string,
//! accepts collections carrying that signature, and turns a batch of
//! them into a shared group header plus one body per stream. Decoding
//! reverses a single body against the group header.

pub mod bst;
pub mod enumerated;
pub mod euler;
pub mod event;
pub mod octree;
pub mod position;

pub use enumerated::EnumEncoder;
pub use euler::EulerEncoder;
pub use event::EventEncoder;
pub use position::PositionEncoder;

use crate::capture::CaptureCollection;
use crate::util::{Error, Result};

/// Time precision for codecs that store raw floating-point samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTechnique {
    /// 64-bit float storage; lossless.
    Raw64,
    /// 32-bit float storage.
    Raw32,
}

impl StorageTechnique {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            StorageTechnique::Raw64 => 0,
            StorageTechnique::Raw32 => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8, signature: &str) -> Result<Self> {
        match byte {
            0 => Ok(StorageTechnique::Raw64),
            1 => Ok(StorageTechnique::Raw32),
            other => Err(Error::invalid(format!(
                "unknown storage technique {other} for {signature}"
            ))),
        }
    }
}

/// A capture stream codec.
///
/// Encoders are stateless across calls; any dictionaries they build live
/// only within a single [`Encoder::encode`] invocation.
pub trait Encoder {
    /// The signature string this codec is registered under.
    fn signature(&self) -> &'static str;

    /// Codec version recorded alongside every group it encodes.
    fn version(&self) -> u32;

    /// Whether this codec can encode the given collection.
    fn accepts(&self, collection: &CaptureCollection) -> bool;

    /// Encode a batch of same-signature collections.
    ///
    /// Returns the shared group header and one body per collection, in
    /// the order given.
    fn encode(&self, collections: &[&CaptureCollection]) -> Result<(Vec<u8>, Vec<Vec<u8>>)>;

    /// Decode one stream body against the group header.
    fn decode(&self, header: &[u8], body: &[u8]) -> Result<CaptureCollection>;
}

/// The standard encoder set: lossless position, euler, and event
/// streams, and 32-bit enum streams.
pub fn default_encoders() -> Vec<Box<dyn Encoder>> {
    vec![
        Box::new(PositionEncoder::new(position::Technique::Raw64)),
        Box::new(EulerEncoder::new(StorageTechnique::Raw64)),
        Box::new(EventEncoder::new(StorageTechnique::Raw64)),
        Box::new(EnumEncoder::new(StorageTechnique::Raw32)),
    ]
}
