//! # RAP
//!
//! Rust implementation of the RAP (.rap) recording container format.
//!
//! A recording is a tree of named nodes, each carrying typed metadata,
//! heterogeneous capture streams (positions, Euler rotations, discrete
//! events, enumerated states), and references to external binaries. The
//! container serializes that tree into a compact, self-delimiting byte
//! stream and restores it losslessly for the raw codecs, or with
//! bounded, documented quantization error for the Oct24 position codec.
//!
//! ## Modules
//!
//! - [`util`] - Error and result types
//! - [`binary`] - Varint, string, and array wire primitives
//! - [`metadata`] - Typed property blocks
//! - [`capture`] - Capture records and collections
//! - [`encoding`] - Stream codecs and the [`encoding::Encoder`] trait
//! - [`container`] - File framing, writer, and reader
//! - [`legacy`] - Gating seam for prior container versions
//!
//! ## Example
//!
//! ```
//! use rap::capture::position;
//! use rap::{Reader, Recording, Writer};
//!
//! let recording = Recording::new("", "demo").with_collections(vec![
//!     position::Collection::new(
//!         "Position",
//!         vec![position::Capture::new(1.0, 1.0, 2.0, 3.0)],
//!     )
//!     .into(),
//! ]);
//!
//! let mut data = Vec::new();
//! let written = Writer::with_default_encoders(&mut data).write(&recording)?;
//!
//! let (decoded, read) = Reader::with_default_encoders(data.as_slice()).read()?;
//! assert_eq!(written, read);
//! assert_eq!(decoded, recording);
//! # Ok::<(), rap::Error>(())
//! ```

pub mod binary;
pub mod capture;
pub mod container;
pub mod encoding;
pub mod legacy;
pub mod metadata;
pub mod recording;
pub mod util;

// Re-export commonly used types
pub use capture::CaptureCollection;
pub use container::{Reader, Writer};
pub use metadata::{Block, Property};
pub use recording::{BinaryReference, Recording};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capture::{enumerated, euler, event, position, CaptureCollection};
    pub use crate::container::{Reader, Writer};
    pub use crate::encoding::{default_encoders, Encoder, StorageTechnique};
    pub use crate::metadata::{Block, Property};
    pub use crate::recording::{BinaryReference, Recording};
    pub use crate::util::{Error, Result};
}
