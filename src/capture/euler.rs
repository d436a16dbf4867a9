//! Euler-angle rotation samples.

use glam::DVec3;

/// Order in which the component rotations are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EulerOrder {
    /// Z, then X, then Y. The only order the format records.
    #[default]
    Zxy,
}

/// A single timestamped Euler rotation, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    time: f64,
    euler: DVec3,
}

impl Capture {
    /// Create a ZXY-ordered rotation capture.
    pub fn zxy(time: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            time,
            euler: DVec3::new(x, y, z),
        }
    }

    /// Sample time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The rotation's Euler angles.
    #[inline]
    pub fn euler(&self) -> DVec3 {
        self.euler
    }
}

/// A named stream of rotation captures.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    order: EulerOrder,
    captures: Vec<Capture>,
}

impl Collection {
    /// Encoder signature for euler streams.
    pub const SIGNATURE: &'static str = "recolude.euler";

    /// Create a collection from its captures.
    pub fn new(name: impl Into<String>, captures: Vec<Capture>) -> Self {
        Self {
            name: name.into(),
            order: EulerOrder::Zxy,
            captures,
        }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rotation application order for every capture in the stream.
    pub fn order(&self) -> EulerOrder {
        self.order
    }

    /// The captures, in stream order.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }
}
