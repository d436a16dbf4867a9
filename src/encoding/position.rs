//! Position stream codec.
//!
//! Three techniques share the `recolude.position` signature: raw 64- and
//! 32-bit storage, and the lossy Oct24 quantizer. Oct24 delta-codes both
//! time and position, squeezing each position delta into a 3-byte octree
//! word and each time delta into a 2-byte binary-search code.

use std::io::Read;

use glam::DVec3;

use super::{bst, octree, Encoder};
use crate::binary;
use crate::capture::{position, CaptureCollection};
use crate::util::{Error, Result};

/// Bytes of BST precision per time delta.
const TIME_BYTES: usize = 2;

/// Storage technique for position streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    /// 64-bit floats; lossless.
    Raw64,
    /// 32-bit floats.
    Raw32,
    /// Delta-coded octree quantization, 5 bytes per capture.
    Oct24,
}

impl Technique {
    fn to_byte(self) -> u8 {
        match self {
            Technique::Raw64 => 0,
            Technique::Raw32 => 1,
            Technique::Oct24 => 2,
        }
    }

    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Technique::Raw64),
            1 => Ok(Technique::Raw32),
            2 => Ok(Technique::Oct24),
            other => Err(Error::invalid(format!(
                "unknown storage technique {other} for {}",
                position::Collection::SIGNATURE
            ))),
        }
    }
}

/// Codec for position capture streams.
#[derive(Debug, Clone, Copy)]
pub struct PositionEncoder {
    technique: Technique,
}

impl PositionEncoder {
    /// Create an encoder using the given technique.
    pub fn new(technique: Technique) -> Self {
        Self { technique }
    }

    fn encode_collection(&self, collection: &position::Collection) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        binary::push_string(&mut out, collection.name());
        out.push(self.technique.to_byte());

        match self.technique {
            Technique::Raw64 => {
                binary::push_uvarint(&mut out, collection.captures().len() as u64);
                for capture in collection.captures() {
                    binary::push_f64(&mut out, capture.time());
                    let p = capture.position();
                    binary::push_f64(&mut out, p.x);
                    binary::push_f64(&mut out, p.y);
                    binary::push_f64(&mut out, p.z);
                }
            }
            Technique::Raw32 => {
                binary::push_uvarint(&mut out, collection.captures().len() as u64);
                for capture in collection.captures() {
                    binary::push_f32(&mut out, capture.time() as f32);
                    let p = capture.position();
                    binary::push_f32(&mut out, p.x as f32);
                    binary::push_f32(&mut out, p.y as f32);
                    binary::push_f32(&mut out, p.z as f32);
                }
            }
            Technique::Oct24 => encode_oct24(collection, &mut out)?,
        }

        Ok(out)
    }
}

impl Encoder for PositionEncoder {
    fn signature(&self) -> &'static str {
        position::Collection::SIGNATURE
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
            let CaptureCollection::Position(positions) = collection else {
                return Err(Error::WrongCaptureType {
                    collection: collection.name().to_string(),
                    expected: "position",
                });
            };
            bodies.push(self.encode_collection(positions)?);
        }
        Ok((Vec::new(), bodies))
    }

    fn decode(&self, _header: &[u8], body: &[u8]) -> Result<CaptureCollection> {
        let mut r = body;
        let name = binary::read_string(&mut r)?;
        let technique = Technique::from_byte(binary::read_u8(&mut r)?)?;

        let collection = match technique {
            Technique::Raw64 => {
                let count = binary::read_uvarint(&mut r)? as usize;
                let mut captures = Vec::with_capacity(count.min(65536));
                for _ in 0..count {
                    let time = binary::read_f64(&mut r)?;
                    let x = binary::read_f64(&mut r)?;
                    let y = binary::read_f64(&mut r)?;
                    let z = binary::read_f64(&mut r)?;
                    captures.push(position::Capture::new(time, x, y, z));
                }
                position::Collection::new(name, captures)
            }
            Technique::Raw32 => {
                let count = binary::read_uvarint(&mut r)? as usize;
                let mut captures = Vec::with_capacity(count.min(65536));
                for _ in 0..count {
                    let time = binary::read_f32(&mut r)?;
                    let x = binary::read_f32(&mut r)?;
                    let y = binary::read_f32(&mut r)?;
                    let z = binary::read_f32(&mut r)?;
                    captures.push(position::Capture::new(
                        f64::from(time),
                        f64::from(x),
                        f64::from(y),
                        f64::from(z),
                    ));
                }
                position::Collection::new(name, captures)
            }
            Technique::Oct24 => decode_oct24(&mut r, name)?,
        };

        Ok(CaptureCollection::Position(collection))
    }
}

/// Round a vector through f32, matching what the wire stores.
fn round_trip_f32(v: DVec3) -> DVec3 {
    DVec3::new(
        f64::from(v.x as f32),
        f64::from(v.y as f32),
        f64::from(v.z as f32),
    )
}

fn encode_oct24(collection: &position::Collection, out: &mut Vec<u8>) -> Result<()> {
    let captures = collection.captures();
    binary::push_uvarint(out, captures.len() as u64);
    if captures.is_empty() {
        return Ok(());
    }

    let t0 = captures[0].time() as f32;
    binary::push_f32(out, t0);

    if captures.len() == 1 {
        let p = captures[0].position();
        binary::push_f32(out, p.x as f32);
        binary::push_f32(out, p.y as f32);
        binary::push_f32(out, p.z as f32);
        return Ok(());
    }

    // Delta bounds over the whole stream.
    let mut max_time_delta = f64::NEG_INFINITY;
    let mut min_delta = DVec3::splat(f64::INFINITY);
    let mut max_delta = DVec3::splat(f64::NEG_INFINITY);
    for i in 1..captures.len() {
        let dt = captures[i].time() - captures[i - 1].time();
        if dt < 0.0 {
            return Err(Error::NonMonotonicTime {
                collection: collection.name().to_string(),
                index: i,
            });
        }
        max_time_delta = max_time_delta.max(dt);

        let delta = captures[i].position() - captures[i - 1].position();
        min_delta = min_delta.min(delta);
        max_delta = max_delta.max(delta);
    }

    binary::push_f32(out, max_time_delta as f32);
    binary::push_f32(out, min_delta.x as f32);
    binary::push_f32(out, min_delta.y as f32);
    binary::push_f32(out, min_delta.z as f32);
    binary::push_f32(out, max_delta.x as f32);
    binary::push_f32(out, max_delta.y as f32);
    binary::push_f32(out, max_delta.z as f32);

    let p0 = captures[0].position();
    binary::push_f32(out, p0.x as f32);
    binary::push_f32(out, p0.y as f32);
    binary::push_f32(out, p0.z as f32);

    // Quantize against the f32 values the decoder will read back, so the
    // two reconstructed trajectories are bit-identical.
    let max_time_delta = f64::from(max_time_delta as f32);
    let min_delta = round_trip_f32(min_delta);
    let max_delta = round_trip_f32(max_delta);

    let mut total_quantized_time = f64::from(t0);
    let mut quantized_position = round_trip_f32(p0);

    let mut time_buf = [0u8; TIME_BYTES];
    for (i, capture) in captures.iter().enumerate() {
        let duration = capture.time() - total_quantized_time;
        bst::quantize(duration, 0.0, max_time_delta, &mut time_buf);
        out.extend_from_slice(&time_buf);

        // Accumulate the quantized delta, not the ideal one.
        total_quantized_time += bst::dequantize(0.0, max_time_delta, &time_buf);

        // The first capture is the starting position; no delta to store.
        if i > 0 {
            let direction = capture.position() - quantized_position;
            let cells = octree::point_to_cells(direction, min_delta, max_delta);
            out.extend_from_slice(&octree::pack_cells24(&cells));

            quantized_position += octree::cells_to_point(min_delta, max_delta, &cells);
        }
    }

    Ok(())
}

fn decode_oct24<R: Read>(r: &mut R, name: String) -> Result<position::Collection> {
    let count = binary::read_uvarint(r)? as usize;
    if count == 0 {
        return Ok(position::Collection::new(name, Vec::new()));
    }

    let t0 = binary::read_f32(r)?;

    if count == 1 {
        let x = binary::read_f32(r)?;
        let y = binary::read_f32(r)?;
        let z = binary::read_f32(r)?;
        return Ok(position::Collection::new(
            name,
            vec![position::Capture::new(
                f64::from(t0),
                f64::from(x),
                f64::from(y),
                f64::from(z),
            )],
        ));
    }

    let max_time_delta = f64::from(binary::read_f32(r)?);
    let min_delta = DVec3::new(
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
    );
    let max_delta = DVec3::new(
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
    );
    let start = DVec3::new(
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
        f64::from(binary::read_f32(r)?),
    );

    let mut captures = Vec::with_capacity(count.min(65536));
    let mut time_buf = [0u8; TIME_BYTES];
    let mut oct_buf = [0u8; 3];
    let mut current_time = f64::from(t0);
    let mut current_position = start;

    for i in 0..count {
        binary::fill(r, &mut time_buf)?;
        current_time += bst::dequantize(0.0, max_time_delta, &time_buf);

        if i > 0 {
            binary::fill(r, &mut oct_buf)?;
            let cells = octree::unpack_cells24(&oct_buf);
            current_position += octree::cells_to_point(min_delta, max_delta, &cells);
        }

        captures.push(position::Capture::new(
            current_time,
            current_position.x,
            current_position.y,
            current_position.z,
        ));
    }

    Ok(position::Collection::new(name, captures))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(captures: Vec<position::Capture>) -> CaptureCollection {
        position::Collection::new("Position", captures).into()
    }

    fn round_trip(encoder: &PositionEncoder, input: &CaptureCollection) -> position::Collection {
        let (header, bodies) = encoder.encode(&[input]).unwrap();
        assert_eq!(bodies.len(), 1);
        match encoder.decode(&header, &bodies[0]).unwrap() {
            CaptureCollection::Position(c) => c,
            other => panic!("expected position collection, got {other:?}"),
        }
    }

    #[test]
    fn test_raw64_lossless() {
        let encoder = PositionEncoder::new(Technique::Raw64);
        let input = collection(vec![
            position::Capture::new(1.0, 1.0, 2.0, 3.0),
            position::Capture::new(2.0, 4.0, 5.0, 6.0),
            position::Capture::new(4.0, 7.0, 8.0, 9.0),
            position::Capture::new(7.0, 10.0, 11.0, 12.0),
        ]);

        let decoded = round_trip(&encoder, &input);
        assert_eq!(CaptureCollection::Position(decoded), input);
    }

    #[test]
    fn test_raw32_precision() {
        let encoder = PositionEncoder::new(Technique::Raw32);
        let input = collection(vec![position::Capture::new(1.5, -2.25, 0.5, 100.0)]);

        let decoded = round_trip(&encoder, &input);
        let capture = decoded.captures()[0];
        assert_eq!(capture.time(), 1.5);
        assert_eq!(capture.position(), DVec3::new(-2.25, 0.5, 100.0));
    }

    #[test]
    fn test_oct24_empty_stream() {
        let encoder = PositionEncoder::new(Technique::Oct24);
        let decoded = round_trip(&encoder, &collection(Vec::new()));
        assert!(decoded.captures().is_empty());
    }

    #[test]
    fn test_oct24_single_capture() {
        let encoder = PositionEncoder::new(Technique::Oct24);
        let input = collection(vec![position::Capture::new(1.0, 2.0, 3.0, 4.0)]);

        let decoded = round_trip(&encoder, &input);
        assert_eq!(decoded.captures().len(), 1);
        let capture = decoded.captures()[0];
        assert_eq!(capture.time(), 1.0);
        assert_eq!(capture.position(), DVec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_oct24_bounded_error() {
        let encoder = PositionEncoder::new(Technique::Oct24);
        let mut captures = Vec::new();
        for i in 0..100 {
            let t = i as f64 * 0.1;
            captures.push(position::Capture::new(
                t,
                (t * 1.3).sin() * 10.0,
                t * 0.5,
                (t * 0.7).cos() * 5.0,
            ));
        }
        let input = collection(captures.clone());

        let decoded = round_trip(&encoder, &input);
        assert_eq!(decoded.captures().len(), captures.len());

        // Deltas span at most ~1.3 per axis; a conservative cumulative
        // tolerance still distinguishes working drift correction from a
        // diverging trajectory.
        let max_time_delta = 0.1;
        for (got, want) in decoded.captures().iter().zip(&captures) {
            assert!((got.time() - want.time()).abs() < max_time_delta);
            let err = (got.position() - want.position()).abs();
            assert!(
                err.max_element() < 0.05,
                "drifted: got {:?}, want {:?}",
                got.position(),
                want.position()
            );
        }
    }

    #[test]
    fn test_oct24_time_error_bound() {
        let encoder = PositionEncoder::new(Technique::Oct24);
        let captures = vec![
            position::Capture::new(1.0, 1.0, 2.0, 3.0),
            position::Capture::new(2.0, 4.0, 5.0, 6.0),
            position::Capture::new(4.0, 7.0, 8.0, 9.0),
            position::Capture::new(7.0, 10.0, 11.0, 12.0),
        ];
        let input = collection(captures.clone());

        let decoded = round_trip(&encoder, &input);
        // Max time delta is 3; per-step error bounded by 3 / 2^17, and
        // drift correction keeps it from compounding.
        let bound = 4.0 * 3.0 / (1u64 << 17) as f64;
        for (got, want) in decoded.captures().iter().zip(&captures) {
            assert!((got.time() - want.time()).abs() <= bound);
        }
    }

    #[test]
    fn test_oct24_rejects_non_monotone_time() {
        let encoder = PositionEncoder::new(Technique::Oct24);
        let input = collection(vec![
            position::Capture::new(2.0, 0.0, 0.0, 0.0),
            position::Capture::new(1.0, 1.0, 1.0, 1.0),
        ]);

        let err = encoder.encode(&[&input]).unwrap_err();
        assert!(matches!(err, Error::NonMonotonicTime { index: 1, .. }));
    }

    #[test]
    fn test_rejects_wrong_capture_type() {
        let encoder = PositionEncoder::new(Technique::Raw64);
        let events: CaptureCollection =
            crate::capture::event::Collection::new("e", Vec::new()).into();

        let err = encoder.encode(&[&events]).unwrap_err();
        assert!(matches!(err, Error::WrongCaptureType { .. }));
    }

    #[test]
    fn test_accepts_by_signature() {
        let encoder = PositionEncoder::new(Technique::Raw64);
        assert!(encoder.accepts(&collection(Vec::new())));
        assert!(!encoder.accepts(&crate::capture::event::Collection::new("e", Vec::new()).into()));
    }
}
