//! Container layer: framing, dispatch, and the writer/reader pair.
//!
//! A recording file is the 4-byte magic, a uvarint container version,
//! and one recursive node frame. Every level is length-prefixed, so the
//! format is self-delimiting and the writer's reported byte count always
//! equals the reader's consumed count.

pub mod format;
mod reader;
mod writer;

pub use format::{CURRENT_VERSION, LEGACY_VERSION, MAGIC};
pub use reader::Reader;
pub use writer::Writer;
