//! Positional samples.

use glam::DVec3;

/// A single timestamped 3-D position sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    time: f64,
    position: DVec3,
}

impl Capture {
    /// Create a capture at `time` with the given position.
    pub fn new(time: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            time,
            position: DVec3::new(x, y, z),
        }
    }

    /// Sample time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Sampled position.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }
}

/// A named stream of position captures.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    captures: Vec<Capture>,
}

impl Collection {
    /// Encoder signature for position streams.
    pub const SIGNATURE: &'static str = "recolude.position";

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
