//! Error types for the RAP library.

use thiserror::Error;

/// Main error type for RAP operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid magic bytes at start of a recording file
    #[error("invalid recording file: bad magic bytes")]
    InvalidMagic,

    /// Data ended before a complete value could be read
    #[error("unexpected end of input")]
    TruncatedInput,

    /// Malformed variable-length integer
    #[error("malformed uvarint")]
    BadVarint,

    /// Unknown property code or malformed metadata block
    #[error("invalid metadata: {0}")]
    BadMetadata(String),

    /// Writer has no encoder for a collection's signature
    #[error("no encoder registered to handle stream: {0}")]
    NoEncoderFor(String),

    /// Reader cannot handle the recorded version for a signature
    #[error("unsupported version {version} for {signature}")]
    UnsupportedVersion { signature: String, version: u64 },

    /// A collection holds a capture variant the encoder cannot handle
    #[error("collection {collection:?} holds a capture that is not a {expected} capture")]
    WrongCaptureType {
        collection: String,
        expected: &'static str,
    },

    /// Capture times must be nondecreasing for delta-coded techniques
    #[error("capture times must be nondecreasing: {collection:?} at index {index}")]
    NonMonotonicTime { collection: String, index: usize },

    /// Writer was given no recording to write
    #[error("can not write nil recording")]
    NilRecording,

    /// Structurally invalid stream data
    #[error("invalid stream structure: {0}")]
    InvalidStructure(String),

    /// Underlying sink or source failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create a bad metadata error.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::BadMetadata(msg.into())
    }
}

/// Result type alias for RAP operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::NoEncoderFor("test.data".to_string());
        assert_eq!(
            e.to_string(),
            "no encoder registered to handle stream: test.data"
        );

        let e = Error::NilRecording;
        assert_eq!(e.to_string(), "can not write nil recording");

        let e = Error::UnsupportedVersion {
            signature: "recolude.position".to_string(),
            version: 9,
        };
        assert!(e.to_string().contains("recolude.position"));
        assert!(e.to_string().contains('9'));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
