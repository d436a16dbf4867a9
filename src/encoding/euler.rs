//! Euler rotation stream codec.
//!
//! Rotations are stored raw at 64- or 32-bit precision: time followed by
//! the three angle components per capture. The ZXY application order is
//! a fixed property of euler collections and survives the round trip.

use super::{Encoder, StorageTechnique};
use crate::binary;
use crate::capture::{euler, CaptureCollection};
use crate::util::{Error, Result};

/// Codec for euler rotation capture streams.
#[derive(Debug, Clone, Copy)]
pub struct EulerEncoder {
    technique: StorageTechnique,
}

impl EulerEncoder {
    /// Create an encoder using the given precision.
    pub fn new(technique: StorageTechnique) -> Self {
        Self { technique }
    }

    fn encode_collection(&self, collection: &euler::Collection) -> Vec<u8> {
        let mut out = Vec::new();
        binary::push_string(&mut out, collection.name());
        out.push(self.technique.to_byte());
        binary::push_uvarint(&mut out, collection.captures().len() as u64);

        for capture in collection.captures() {
            let angles = capture.euler();
            match self.technique {
                StorageTechnique::Raw64 => {
                    binary::push_f64(&mut out, capture.time());
                    binary::push_f64(&mut out, angles.x);
                    binary::push_f64(&mut out, angles.y);
                    binary::push_f64(&mut out, angles.z);
                }
                StorageTechnique::Raw32 => {
                    binary::push_f32(&mut out, capture.time() as f32);
                    binary::push_f32(&mut out, angles.x as f32);
                    binary::push_f32(&mut out, angles.y as f32);
                    binary::push_f32(&mut out, angles.z as f32);
                }
            }
        }

        out
    }
}

impl Encoder for EulerEncoder {
    fn signature(&self) -> &'static str {
        euler::Collection::SIGNATURE
    }

    fn version(&self) -> u32 {
        0
    }

    fn accepts(&self, collection: &CaptureCollection) -> bool {
        collection.signature() == self.signature()
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<(Vec<u8>, Vec<Vec<u8>>)> {
        let mut bodies = Vec::with_capacity(collections.len());
        for collection in collections {
            let CaptureCollection::Euler(rotations) = collection else {
                return Err(Error::WrongCaptureType {
                    collection: collection.name().to_string(),
                    expected: "euler",
                });
            };
            bodies.push(self.encode_collection(rotations));
        }
        Ok((Vec::new(), bodies))
    }

    fn decode(&self, _header: &[u8], body: &[u8]) -> Result<CaptureCollection> {
        let mut r = body;
        let name = binary::read_string(&mut r)?;
        let technique = StorageTechnique::from_byte(binary::read_u8(&mut r)?, self.signature())?;
        let count = binary::read_uvarint(&mut r)? as usize;

        let mut captures = Vec::with_capacity(count.min(65536));
        for _ in 0..count {
            let capture = match technique {
                StorageTechnique::Raw64 => euler::Capture::zxy(
                    binary::read_f64(&mut r)?,
                    binary::read_f64(&mut r)?,
                    binary::read_f64(&mut r)?,
                    binary::read_f64(&mut r)?,
                ),
                StorageTechnique::Raw32 => euler::Capture::zxy(
                    f64::from(binary::read_f32(&mut r)?),
                    f64::from(binary::read_f32(&mut r)?),
                    f64::from(binary::read_f32(&mut r)?),
                    f64::from(binary::read_f32(&mut r)?),
                ),
            };
            captures.push(capture);
        }

        Ok(CaptureCollection::Euler(euler::Collection::new(
            name, captures,
        )))
    }
}
