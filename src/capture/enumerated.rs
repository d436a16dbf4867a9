//! Enumerated state samples.

/// A single sample referencing an entry of the collection's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    time: f64,
    value: u32,
}

impl Capture {
    /// Create a capture selecting vocabulary entry `value`.
    pub fn new(time: f64, value: u32) -> Self {
        Self { time, value }
    }

    /// Sample time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Index into the collection's vocabulary.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// A named stream of enumerated captures with an ordered vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    values: Vec<String>,
    captures: Vec<Capture>,
}

impl Collection {
    /// Encoder signature for enum streams.
    pub const SIGNATURE: &'static str = "recolude.enum";

    /// Create a collection with its vocabulary and captures.
    pub fn new(name: impl Into<String>, values: Vec<String>, captures: Vec<Capture>) -> Self {
        Self {
            name: name.into(),
            values,
            captures,
        }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered vocabulary capture values index into.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The captures, in stream order.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }
}
