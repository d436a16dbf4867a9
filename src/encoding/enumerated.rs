//! Enumerated state stream codec.
//!
//! The collection's ordered vocabulary leads the stream body; each
//! capture then stores its time and a uvarint index into it.

use super::{Encoder, StorageTechnique};
use crate::binary;
use crate::capture::{enumerated, CaptureCollection};
use crate::util::{Error, Result};

/// Codec for enumerated capture streams.
#[derive(Debug, Clone, Copy)]
pub struct EnumEncoder {
    technique: StorageTechnique,
}

impl EnumEncoder {
    /// Create an encoder using the given time precision.
    pub fn new(technique: StorageTechnique) -> Self {
        Self { technique }
    }
}

impl Encoder for EnumEncoder {
    fn signature(&self) -> &'static str {
        enumerated::Collection::SIGNATURE
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
            let CaptureCollection::Enum(states) = collection else {
                return Err(Error::WrongCaptureType {
                    collection: collection.name().to_string(),
                    expected: "enum",
                });
            };

            let mut body = Vec::new();
            binary::push_string(&mut body, states.name());
            body.push(self.technique.to_byte());
            binary::push_string_array(&mut body, states.values());
            binary::push_uvarint(&mut body, states.captures().len() as u64);

            for capture in states.captures() {
                match self.technique {
                    StorageTechnique::Raw64 => binary::push_f64(&mut body, capture.time()),
                    StorageTechnique::Raw32 => binary::push_f32(&mut body, capture.time() as f32),
                }
                binary::push_uvarint(&mut body, u64::from(capture.value()));
            }

            bodies.push(body);
        }

        Ok((Vec::new(), bodies))
    }

    fn decode(&self, _header: &[u8], body: &[u8]) -> Result<CaptureCollection> {
        let mut r = body;
        let name = binary::read_string(&mut r)?;
        let technique = StorageTechnique::from_byte(binary::read_u8(&mut r)?, self.signature())?;
        let values = binary::read_string_array(&mut r)?;
        let count = binary::read_uvarint(&mut r)? as usize;

        let mut captures = Vec::with_capacity(count.min(65536));
        for _ in 0..count {
            let time = match technique {
                StorageTechnique::Raw64 => binary::read_f64(&mut r)?,
                StorageTechnique::Raw32 => f64::from(binary::read_f32(&mut r)?),
            };
            let value = binary::read_uvarint(&mut r)?;
            let value = u32::try_from(value)
                .map_err(|_| Error::invalid(format!("enum index {value} out of range")))?;
            captures.push(enumerated::Capture::new(time, value));
        }

        Ok(CaptureCollection::Enum(enumerated::Collection::new(
            name, values, captures,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let encoder = EnumEncoder::new(StorageTechnique::Raw32);
        let input: CaptureCollection = enumerated::Collection::new(
            "cmon",
            vec!["A".to_string(), "n".to_string()],
            vec![enumerated::Capture::new(1.0, 1)],
        )
        .into();

        let (header, bodies) = encoder.encode(&[&input]).unwrap();
        assert!(header.is_empty());
        assert_eq!(encoder.decode(&header, &bodies[0]).unwrap(), input);
    }

    #[test]
    fn test_vocabulary_order_preserved() {
        let encoder = EnumEncoder::new(StorageTechnique::Raw64);
        let values = vec!["idle".to_string(), "walk".to_string(), "run".to_string()];
        let input: CaptureCollection = enumerated::Collection::new(
            "state",
            values.clone(),
            vec![
                enumerated::Capture::new(0.0, 0),
                enumerated::Capture::new(1.0, 2),
                enumerated::Capture::new(2.0, 1),
            ],
        )
        .into();

        let (header, bodies) = encoder.encode(&[&input]).unwrap();
        let CaptureCollection::Enum(decoded) = encoder.decode(&header, &bodies[0]).unwrap()
        else {
            panic!("expected enum collection");
        };
        assert_eq!(decoded.values(), values.as_slice());
        assert_eq!(decoded.captures()[1].value(), 2);
    }

    #[test]
    fn test_rejects_wrong_capture_type() {
        let encoder = EnumEncoder::new(StorageTechnique::Raw32);
        let events: CaptureCollection =
            crate::capture::event::Collection::new("e", Vec::new()).into();
        assert!(matches!(
            encoder.encode(&[&events]),
            Err(Error::WrongCaptureType { .. })
        ));
    }
}
