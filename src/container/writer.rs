//! Container writer.
//!
//! A recording tree is walked depth-first. At every node the writer
//! partitions the capture collections by signature, hands each group to
//! the first registered encoder that accepts it, and frames the result
//! as a self-delimiting node record: identity, metadata, encoder groups,
//! binary references, then child nodes.

use std::collections::HashMap;
use std::io::Write;

use log::{debug, trace};

use super::format::{CURRENT_VERSION, MAGIC};
use crate::binary::{self, CountingWriter};
use crate::capture::CaptureCollection;
use crate::encoding::{default_encoders, Encoder};
use crate::recording::Recording;
use crate::util::{Error, Result};

enum State {
    Ready,
    Failed(String),
}

/// Serializes recording trees to a byte sink.
///
/// The writer owns its sink for the duration of a [`Writer::write`]
/// call. A sink failure poisons the writer: the partial output is
/// invalid and every later operation reports the failure.
pub struct Writer<W: Write> {
    encoders: Vec<Box<dyn Encoder>>,
    sink: W,
    state: State,
}

impl<W: Write> Writer<W> {
    /// Create a writer dispatching to the given encoders.
    pub fn new(encoders: Vec<Box<dyn Encoder>>, sink: W) -> Self {
        Self {
            encoders,
            sink,
            state: State::Ready,
        }
    }

    /// Create a writer with the standard encoder set.
    pub fn with_default_encoders(sink: W) -> Self {
        Self::new(default_encoders(), sink)
    }

    /// Write one recording tree, returning the total bytes emitted.
    ///
    /// Accepts `&Recording` or an `Option`; a missing recording fails
    /// with [`Error::NilRecording`] before touching the sink.
    pub fn write<'a>(&mut self, recording: impl Into<Option<&'a Recording>>) -> Result<u64> {
        if let State::Failed(msg) = &self.state {
            return Err(Error::invalid(format!("writer previously failed: {msg}")));
        }

        let Some(recording) = recording.into() else {
            return Err(Error::NilRecording);
        };

        let encoders = &self.encoders;
        let mut out = CountingWriter::new(&mut self.sink);

        let result = (|| -> Result<()> {
            out.write_all(MAGIC)?;
            binary::write_uvarint(&mut out, CURRENT_VERSION)?;
            write_node(encoders, &mut out, recording)
        })();
        let count = out.count();

        match result {
            Ok(()) => {
                debug!("wrote recording {:?}: {count} bytes", recording.name());
                Ok(count)
            }
            Err(err) => {
                self.state = State::Failed(err.to_string());
                Err(err)
            }
        }
    }
}

fn write_node<W: Write>(
    encoders: &[Box<dyn Encoder>],
    out: &mut W,
    recording: &Recording,
) -> Result<()> {
    trace!(
        "writing node {:?}: {} collections, {} children",
        recording.name(),
        recording.collections().len(),
        recording.children().len()
    );

    binary::write_string(out, recording.id())?;
    binary::write_string(out, recording.name())?;
    out.write_all(&recording.metadata().to_bytes())?;

    // Group collections by signature, keeping first-appearance order so
    // output bytes are deterministic for a given tree.
    let mut order: Vec<&'static str> = Vec::new();
    let mut groups: HashMap<&'static str, Vec<&CaptureCollection>> = HashMap::new();
    for collection in recording.collections() {
        let signature = collection.signature();
        if !groups.contains_key(signature) {
            order.push(signature);
        }
        groups.entry(signature).or_default().push(collection);
    }

    binary::write_uvarint(out, order.len() as u64)?;
    for signature in order {
        let group = &groups[signature];
        let encoder = encoders
            .iter()
            .find(|e| e.accepts(group[0]))
            .ok_or_else(|| Error::NoEncoderFor(signature.to_string()))?;

        let (header, bodies) = encoder.encode(group)?;
        if bodies.len() != group.len() {
            return Err(Error::invalid(format!(
                "encoder {signature} returned {} bodies for {} streams",
                bodies.len(),
                group.len()
            )));
        }

        binary::write_string(out, signature)?;
        binary::write_uvarint(out, u64::from(encoder.version()))?;
        binary::write_uvarint(out, header.len() as u64)?;
        out.write_all(&header)?;
        binary::write_uvarint(out, bodies.len() as u64)?;
        for body in bodies {
            binary::write_uvarint(out, body.len() as u64)?;
            out.write_all(&body)?;
        }
    }

    binary::write_uvarint(out, recording.references().len() as u64)?;
    for reference in recording.references() {
        binary::write_string(out, reference.name())?;
        binary::write_string(out, reference.uri())?;
        binary::write_uvarint(out, reference.size())?;
        out.write_all(&reference.metadata().to_bytes())?;
    }

    binary::write_uvarint(out, recording.children().len() as u64)?;
    for child in recording.children() {
        write_node(encoders, out, child)?;
    }

    Ok(())
}
