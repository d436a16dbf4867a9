//! Capture records and collections.
//!
//! A capture is a single timestamped sample; a collection is a named,
//! signed stream of captures of one kind. The collection's signature
//! selects the encoder responsible for it on both write and read.

pub mod enumerated;
pub mod euler;
pub mod event;
pub mod position;

/// A capture collection of any supported kind.
///
/// Encoders branch on the variant and reject mismatches, so a collection
/// only ever reaches a codec whose signature it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureCollection {
    Position(position::Collection),
    Euler(euler::Collection),
    Event(event::Collection),
    Enum(enumerated::Collection),
}

impl CaptureCollection {
    /// The signature string that selects this collection's encoder.
    pub fn signature(&self) -> &'static str {
        match self {
            CaptureCollection::Position(_) => position::Collection::SIGNATURE,
            CaptureCollection::Euler(_) => euler::Collection::SIGNATURE,
            CaptureCollection::Event(_) => event::Collection::SIGNATURE,
            CaptureCollection::Enum(_) => enumerated::Collection::SIGNATURE,
        }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        match self {
            CaptureCollection::Position(c) => c.name(),
            CaptureCollection::Euler(c) => c.name(),
            CaptureCollection::Event(c) => c.name(),
            CaptureCollection::Enum(c) => c.name(),
        }
    }

    /// Number of captures in the stream.
    pub fn len(&self) -> usize {
        match self {
            CaptureCollection::Position(c) => c.captures().len(),
            CaptureCollection::Euler(c) => c.captures().len(),
            CaptureCollection::Event(c) => c.captures().len(),
            CaptureCollection::Enum(c) => c.captures().len(),
        }
    }

    /// Check if the stream holds no captures.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<position::Collection> for CaptureCollection {
    fn from(value: position::Collection) -> Self {
        CaptureCollection::Position(value)
    }
}

impl From<euler::Collection> for CaptureCollection {
    fn from(value: euler::Collection) -> Self {
        CaptureCollection::Euler(value)
    }
}

impl From<event::Collection> for CaptureCollection {
    fn from(value: event::Collection) -> Self {
        CaptureCollection::Event(value)
    }
}

impl From<enumerated::Collection> for CaptureCollection {
    fn from(value: enumerated::Collection) -> Self {
        CaptureCollection::Enum(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        let pos: CaptureCollection = position::Collection::new("p", Vec::new()).into();
        assert_eq!(pos.signature(), "recolude.position");

        let rot: CaptureCollection = euler::Collection::new("r", Vec::new()).into();
        assert_eq!(rot.signature(), "recolude.euler");

        let ev: CaptureCollection = event::Collection::new("e", Vec::new()).into();
        assert_eq!(ev.signature(), "recolude.event");

        let en: CaptureCollection = enumerated::Collection::new("s", Vec::new(), Vec::new()).into();
        assert_eq!(en.signature(), "recolude.enum");
    }

    #[test]
    fn test_len() {
        let c: CaptureCollection = position::Collection::new(
            "p",
            vec![position::Capture::new(1.0, 1.0, 2.0, 3.0)],
        )
        .into();
        assert_eq!(c.len(), 1);
        assert!(!c.is_empty());
    }
}
