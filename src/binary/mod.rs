//! Binary wire primitives.
//!
//! Every count and length in the RAP format is a LEB128-style unsigned
//! varint: little-endian 7-bit groups with the high bit as continuation.
//! Strings are uvarint-length-prefixed raw bytes with no terminator.
//! Fixed-width integers and floats are little-endian.
//!
//! Two flavors are provided: streaming `read_*`/`write_*` functions that
//! run against any [`Read`]/[`Write`] and report I/O failures, and
//! infallible `push_*` builders for codecs assembling in-memory bodies.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::util::{Error, Result};

/// Maximum encoded length of a uvarint (10 bytes covers all of u64).
pub const MAX_UVARINT_LEN: usize = 10;

// ============================================================================
// Reading
// ============================================================================

fn map_eof(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::TruncatedInput,
        _ => Error::Io(e),
    }
}

/// Read exactly `buf.len()` bytes, reporting early EOF as truncation.
pub fn fill<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    r.read_exact(buf).map_err(map_eof)
}

/// Read a single byte.
pub fn read_u8<R: Read + ?Sized>(r: &mut R) -> Result<u8> {
    ReadBytesExt::read_u8(r).map_err(map_eof)
}

/// Read a little-endian i32.
pub fn read_i32<R: Read + ?Sized>(r: &mut R) -> Result<i32> {
    r.read_i32::<LittleEndian>().map_err(map_eof)
}

/// Read a little-endian f32.
pub fn read_f32<R: Read + ?Sized>(r: &mut R) -> Result<f32> {
    r.read_f32::<LittleEndian>().map_err(map_eof)
}

/// Read a little-endian f64.
pub fn read_f64<R: Read + ?Sized>(r: &mut R) -> Result<f64> {
    r.read_f64::<LittleEndian>().map_err(map_eof)
}

/// Read an unsigned varint.
///
/// Fails with [`Error::BadVarint`] on encodings that do not fit in a u64.
pub fn read_uvarint<R: Read + ?Sized>(r: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = read_u8(r)?;
        if shift == 63 && byte > 1 {
            return Err(Error::BadVarint);
        }
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift > 63 {
            return Err(Error::BadVarint);
        }
    }
}

/// Read a uvarint-length-prefixed UTF-8 string.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    let len = read_uvarint(r)? as usize;
    let mut buf = vec![0u8; len];
    fill(r, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Read a uvarint-counted array of strings.
pub fn read_string_array<R: Read + ?Sized>(r: &mut R) -> Result<Vec<String>> {
    let count = read_uvarint(r)? as usize;
    let mut out = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        out.push(read_string(r)?);
    }
    Ok(out)
}

/// Read a uvarint-counted array of uvarints.
pub fn read_uint_array<R: Read + ?Sized>(r: &mut R) -> Result<Vec<u64>> {
    let count = read_uvarint(r)? as usize;
    let mut out = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        out.push(read_uvarint(r)?);
    }
    Ok(out)
}

// ============================================================================
// Streaming writes
// ============================================================================

/// Write an unsigned varint.
pub fn write_uvarint<W: Write + ?Sized>(w: &mut W, value: u64) -> Result<()> {
    let mut buf = [0u8; MAX_UVARINT_LEN];
    let len = encode_uvarint(value, &mut buf);
    w.write_all(&buf[..len])?;
    Ok(())
}

/// Write a uvarint-length-prefixed string.
pub fn write_string<W: Write + ?Sized>(w: &mut W, s: &str) -> Result<()> {
    write_uvarint(w, s.len() as u64)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ============================================================================
// Infallible buffer builders
// ============================================================================

fn encode_uvarint(mut value: u64, buf: &mut [u8; MAX_UVARINT_LEN]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

/// Append a uvarint to a buffer.
pub fn push_uvarint(out: &mut Vec<u8>, value: u64) {
    let mut buf = [0u8; MAX_UVARINT_LEN];
    let len = encode_uvarint(value, &mut buf);
    out.extend_from_slice(&buf[..len]);
}

/// Append a length-prefixed string to a buffer.
pub fn push_string(out: &mut Vec<u8>, s: &str) {
    push_uvarint(out, s.len() as u64);
    out.extend_from_slice(s.as_bytes());
}

/// Append a counted string array to a buffer.
pub fn push_string_array(out: &mut Vec<u8>, strings: &[String]) {
    push_uvarint(out, strings.len() as u64);
    for s in strings {
        push_string(out, s);
    }
}

/// Append a counted uvarint array to a buffer.
pub fn push_uint_array(out: &mut Vec<u8>, values: &[u64]) {
    push_uvarint(out, values.len() as u64);
    for &v in values {
        push_uvarint(out, v);
    }
}

/// Append a little-endian i32 to a buffer.
pub fn push_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a little-endian f32 to a buffer.
pub fn push_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a little-endian f64 to a buffer.
pub fn push_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Counting adapters
// ============================================================================

/// Write adapter that tracks how many bytes passed through.
///
/// The container writer reports this total; it must equal the reader's
/// consumed count for the same payload.
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap a sink.
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// Total bytes written so far.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Read adapter that tracks how many bytes were consumed.
pub struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    /// Wrap a source.
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    /// Total bytes consumed so far.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uvarint_bytes(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        push_uvarint(&mut out, value);
        out
    }

    #[test]
    fn test_uvarint_encoding() {
        assert_eq!(uvarint_bytes(0), vec![0]);
        assert_eq!(uvarint_bytes(1), vec![1]);
        assert_eq!(uvarint_bytes(127), vec![0x7f]);
        assert_eq!(uvarint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(uvarint_bytes(300), vec![0xac, 0x02]);
    }

    #[test]
    fn test_uvarint_round_trip() {
        for value in [0, 1, 127, 128, 300, 16383, 16384, u32::MAX as u64, u64::MAX] {
            let bytes = uvarint_bytes(value);
            let mut cursor = bytes.as_slice();
            assert_eq!(read_uvarint(&mut cursor).unwrap(), value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn test_streaming_write_matches_push() {
        let mut streamed = Vec::new();
        write_uvarint(&mut streamed, 99999).unwrap();
        write_string(&mut streamed, "abc").unwrap();

        let mut pushed = Vec::new();
        push_uvarint(&mut pushed, 99999);
        push_string(&mut pushed, "abc");

        assert_eq!(streamed, pushed);
    }

    #[test]
    fn test_uvarint_truncated() {
        let mut cursor: &[u8] = &[0x80];
        assert!(matches!(
            read_uvarint(&mut cursor),
            Err(Error::TruncatedInput)
        ));
    }

    #[test]
    fn test_uvarint_overflow() {
        // Ten bytes whose final group pushes past 64 bits.
        let mut cursor: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(matches!(read_uvarint(&mut cursor), Err(Error::BadVarint)));
    }

    #[test]
    fn test_string_encoding() {
        let mut out = Vec::new();
        push_string(&mut out, "abcd");
        assert_eq!(out, vec![4, b'a', b'b', b'c', b'd']);

        let mut out = Vec::new();
        push_string(&mut out, "");
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn test_string_round_trip() {
        for s in ["", "a", "recolude.position", "日本語"] {
            let mut out = Vec::new();
            push_string(&mut out, s);
            let mut cursor = out.as_slice();
            assert_eq!(read_string(&mut cursor).unwrap(), s);
        }
    }

    #[test]
    fn test_string_array_round_trip() {
        let strings = vec!["".to_string(), "one".to_string(), "two".to_string()];
        let mut out = Vec::new();
        push_string_array(&mut out, &strings);
        let mut cursor = out.as_slice();
        assert_eq!(read_string_array(&mut cursor).unwrap(), strings);
    }

    #[test]
    fn test_uint_array_round_trip() {
        let values = vec![0u64, 7, 128, 99999];
        let mut out = Vec::new();
        push_uint_array(&mut out, &values);
        let mut cursor = out.as_slice();
        assert_eq!(read_uint_array(&mut cursor).unwrap(), values);
    }

    #[test]
    fn test_counting_adapters() {
        let mut w = CountingWriter::new(Vec::new());
        write_string(&mut w, "abc").unwrap();
        write_uvarint(&mut w, 300).unwrap();
        assert_eq!(w.count(), 6);

        let data: &[u8] = &[4, b'a', b'b', b'c', b'd', 0xac, 0x02];
        let mut r = CountingReader::new(data);
        read_string(&mut r).unwrap();
        read_uvarint(&mut r).unwrap();
        assert_eq!(r.count(), 7);
    }
}
