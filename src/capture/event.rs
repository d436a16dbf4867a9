//! Discrete event samples.

use std::collections::BTreeMap;

/// A single named event with string metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    time: f64,
    name: String,
    metadata: BTreeMap<String, String>,
}

impl Capture {
    /// Create an event capture.
    pub fn new(
        time: f64,
        name: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            time,
            name: name.into(),
            metadata,
        }
    }

    /// Sample time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event metadata, keyed by attribute name.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

/// A named stream of event captures.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    captures: Vec<Capture>,
}

impl Collection {
    /// Encoder signature for event streams.
    pub const SIGNATURE: &'static str = "recolude.event";

    /// Create a collection from its captures.
    pub fn new(name: impl Into<String>, captures: Vec<Capture>) -> Self {
        Self {
            name: name.into(),
            captures,
        }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The captures, in stream order.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }
}
