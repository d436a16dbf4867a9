//! Event stream codec.
//!
//! Events repeat names and metadata keys heavily, so one encode batch
//! dictionary-compresses both across every collection it is handed: the
//! shared group header carries the ordered name and key tables, and each
//! body stores indexes into them. Dictionaries live only for the single
//! `encode` call that built them.

use std::collections::{BTreeMap, HashMap};

use super::{Encoder, StorageTechnique};
use crate::binary;
use crate::capture::{event, CaptureCollection};
use crate::util::{Error, Result};

/// Codec for event capture streams.
#[derive(Debug, Clone, Copy)]
pub struct EventEncoder {
    technique: StorageTechnique,
}

impl EventEncoder {
    /// Create an encoder using the given time precision.
    pub fn new(technique: StorageTechnique) -> Self {
        Self { technique }
    }
}

/// Insertion-ordered string table built during one encode batch.
#[derive(Default)]
struct Dictionary {
    entries: Vec<String>,
    indexes: HashMap<String, u64>,
}

impl Dictionary {
    fn index_of(&mut self, value: &str) -> u64 {
        if let Some(&index) = self.indexes.get(value) {
            return index;
        }
        let index = self.entries.len() as u64;
        self.entries.push(value.to_string());
        self.indexes.insert(value.to_string(), index);
        index
    }
}

impl Encoder for EventEncoder {
    fn signature(&self) -> &'static str {
        event::Collection::SIGNATURE
    }

    fn version(&self) -> u32 {
        0
    }

    fn accepts(&self, collection: &CaptureCollection) -> bool {
        collection.signature() == self.signature()
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<(Vec<u8>, Vec<Vec<u8>>)> {
        let mut names = Dictionary::default();
        let mut keys = Dictionary::default();

        let mut bodies = Vec::with_capacity(collections.len());
        for collection in collections {
            let CaptureCollection::Event(events) = collection else {
                return Err(Error::WrongCaptureType {
                    collection: collection.name().to_string(),
                    expected: "event",
                });
            };

            let mut body = Vec::new();
            binary::push_string(&mut body, events.name());
            body.push(self.technique.to_byte());
            binary::push_uvarint(&mut body, events.captures().len() as u64);

            for capture in events.captures() {
                match self.technique {
                    StorageTechnique::Raw64 => binary::push_f64(&mut body, capture.time()),
                    StorageTechnique::Raw32 => binary::push_f32(&mut body, capture.time() as f32),
                }

                binary::push_uvarint(&mut body, names.index_of(capture.name()));

                let mut key_indexes = Vec::with_capacity(capture.metadata().len());
                let mut values = Vec::with_capacity(capture.metadata().len());
                for (key, value) in capture.metadata() {
                    key_indexes.push(keys.index_of(key));
                    values.push(value.clone());
                }
                binary::push_uint_array(&mut body, &key_indexes);
                binary::push_string_array(&mut body, &values);
            }

            bodies.push(body);
        }

        let mut header = Vec::new();
        binary::push_string_array(&mut header, &names.entries);
        binary::push_string_array(&mut header, &keys.entries);

        Ok((header, bodies))
    }

    fn decode(&self, header: &[u8], body: &[u8]) -> Result<CaptureCollection> {
        let mut h = header;
        let names = binary::read_string_array(&mut h)?;
        let keys = binary::read_string_array(&mut h)?;

        let mut r = body;
        let stream_name = binary::read_string(&mut r)?;
        let technique = StorageTechnique::from_byte(binary::read_u8(&mut r)?, self.signature())?;
        let count = binary::read_uvarint(&mut r)? as usize;

        let mut captures = Vec::with_capacity(count.min(65536));
        for _ in 0..count {
            let time = match technique {
                StorageTechnique::Raw64 => binary::read_f64(&mut r)?,
                StorageTechnique::Raw32 => f64::from(binary::read_f32(&mut r)?),
            };

            let name_index = binary::read_uvarint(&mut r)? as usize;
            let name = names
                .get(name_index)
                .ok_or_else(|| Error::invalid(format!("event name index {name_index} out of range")))?;

            let key_indexes = binary::read_uint_array(&mut r)?;
            let values = binary::read_string_array(&mut r)?;
            if key_indexes.len() != values.len() {
                return Err(Error::invalid(format!(
                    "event metadata key/value count mismatch: {} keys, {} values",
                    key_indexes.len(),
                    values.len()
                )));
            }

            let mut metadata = BTreeMap::new();
            for (key_index, value) in key_indexes.iter().zip(values) {
                let key = keys.get(*key_index as usize).ok_or_else(|| {
                    Error::invalid(format!("event metadata key index {key_index} out of range"))
                })?;
                metadata.insert(key.clone(), value);
            }

            captures.push(event::Capture::new(time, name.clone(), metadata));
        }

        Ok(CaptureCollection::Event(event::Collection::new(
            stream_name,
            captures,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(time: f64, name: &str, pairs: &[(&str, &str)]) -> event::Capture {
        let metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        event::Capture::new(time, name, metadata)
    }

    #[test]
    fn test_round_trip() {
        let encoder = EventEncoder::new(StorageTechnique::Raw64);
        let input: CaptureCollection = event::Collection::new(
            "ahhh",
            vec![capture(1.0, "att", &[("1", "2")])],
        )
        .into();

        let (header, bodies) = encoder.encode(&[&input]).unwrap();
        let decoded = encoder.decode(&header, &bodies[0]).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_dictionary_shared_across_collections() {
        let encoder = EventEncoder::new(StorageTechnique::Raw64);
        let a: CaptureCollection = event::Collection::new(
            "a",
            vec![
                capture(1.0, "damage", &[("amount", "3"), ("source", "fall")]),
                capture(2.0, "heal", &[("amount", "5")]),
            ],
        )
        .into();
        let b: CaptureCollection = event::Collection::new(
            "b",
            vec![capture(3.0, "damage", &[("amount", "7")])],
        )
        .into();

        let (header, bodies) = encoder.encode(&[&a, &b]).unwrap();
        assert_eq!(bodies.len(), 2);

        // Both names and both keys appear exactly once in the header.
        let mut h = header.as_slice();
        let names = binary::read_string_array(&mut h).unwrap();
        let keys = binary::read_string_array(&mut h).unwrap();
        assert_eq!(names, vec!["damage".to_string(), "heal".to_string()]);
        assert_eq!(keys, vec!["amount".to_string(), "source".to_string()]);

        assert_eq!(encoder.decode(&header, &bodies[0]).unwrap(), a);
        assert_eq!(encoder.decode(&header, &bodies[1]).unwrap(), b);
    }

    #[test]
    fn test_fresh_dictionary_per_encode() {
        let encoder = EventEncoder::new(StorageTechnique::Raw64);
        let first: CaptureCollection =
            event::Collection::new("a", vec![capture(1.0, "one", &[])]).into();
        let second: CaptureCollection =
            event::Collection::new("b", vec![capture(1.0, "two", &[])]).into();

        let (_, _) = encoder.encode(&[&first]).unwrap();
        let (header, bodies) = encoder.encode(&[&second]).unwrap();

        // The second call's dictionary starts at index zero again.
        let decoded = encoder.decode(&header, &bodies[0]).unwrap();
        assert_eq!(decoded, second);
        let mut h = header.as_slice();
        assert_eq!(
            binary::read_string_array(&mut h).unwrap(),
            vec!["two".to_string()]
        );
    }

    #[test]
    fn test_decode_rejects_bad_name_index() {
        let encoder = EventEncoder::new(StorageTechnique::Raw64);
        let input: CaptureCollection =
            event::Collection::new("a", vec![capture(1.0, "one", &[])]).into();
        let (_, bodies) = encoder.encode(&[&input]).unwrap();

        // Decode against an empty header: index 0 has no entry.
        let empty_header = [0u8, 0u8];
        let err = encoder.decode(&empty_header, &bodies[0]).unwrap_err();
        assert!(matches!(err, Error::InvalidStructure(_)));
    }

    #[test]
    fn test_raw32_time() {
        let encoder = EventEncoder::new(StorageTechnique::Raw32);
        let input: CaptureCollection =
            event::Collection::new("a", vec![capture(1.5, "tick", &[])]).into();

        let (header, bodies) = encoder.encode(&[&input]).unwrap();
        let CaptureCollection::Event(decoded) = encoder.decode(&header, &bodies[0]).unwrap()
        else {
            panic!("expected event collection");
        };
        assert_eq!(decoded.captures()[0].time(), 1.5);
    }
}
