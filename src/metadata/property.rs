//! Typed metadata values.
//!
//! Every property on the wire is a one-byte type code followed by a
//! code-specific payload. The codes are part of the format and must not
//! be renumbered.

use std::io::Read;

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use super::Block;
use crate::binary;
use crate::util::{Error, Result};

const CODE_STRING: u8 = 0;
const CODE_INT32: u8 = 2;
const CODE_BYTE: u8 = 3;
const CODE_FLOAT32: u8 = 4;
const CODE_BOOL: u8 = 5;
const CODE_VEC2: u8 = 6;
const CODE_VEC3: u8 = 7;
const CODE_QUATERNION: u8 = 8;
const CODE_MATRIX3X3: u8 = 9;
const CODE_MATRIX4X4: u8 = 10;
const CODE_BLOCK: u8 = 11;

/// A typed metadata value.
///
/// The `Block` variant nests a whole metadata block, so property trees
/// can be arbitrarily deep; decoding bounds the depth (see
/// [`super::MAX_NESTING_DEPTH`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    String(String),
    Int32(i32),
    Float32(f32),
    Bool(bool),
    Byte(u8),
    Vec2(Vec2),
    Vec3(Vec3),
    Quaternion(Quat),
    Matrix3x3(Mat3),
    Matrix4x4(Mat4),
    Block(Block),
}

impl Property {
    /// The one-byte wire code for this property's type.
    pub fn code(&self) -> u8 {
        match self {
            Property::String(_) => CODE_STRING,
            Property::Int32(_) => CODE_INT32,
            Property::Byte(_) => CODE_BYTE,
            Property::Float32(_) => CODE_FLOAT32,
            Property::Bool(_) => CODE_BOOL,
            Property::Vec2(_) => CODE_VEC2,
            Property::Vec3(_) => CODE_VEC3,
            Property::Quaternion(_) => CODE_QUATERNION,
            Property::Matrix3x3(_) => CODE_MATRIX3X3,
            Property::Matrix4x4(_) => CODE_MATRIX4X4,
            Property::Block(_) => CODE_BLOCK,
        }
    }

    /// The payload bytes of this property, without the leading code byte.
    pub fn data(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_payload(&mut out);
        out
    }

    /// Append the payload (no code byte) to `out`.
    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) {
        match self {
            Property::String(s) => binary::push_string(out, s),
            Property::Int32(v) => binary::push_i32(out, *v),
            Property::Byte(v) => out.push(*v),
            Property::Float32(v) => binary::push_f32(out, *v),
            Property::Bool(v) => out.push(u8::from(*v)),
            Property::Vec2(v) => {
                binary::push_f32(out, v.x);
                binary::push_f32(out, v.y);
            }
            Property::Vec3(v) => {
                binary::push_f32(out, v.x);
                binary::push_f32(out, v.y);
                binary::push_f32(out, v.z);
            }
            Property::Quaternion(q) => {
                binary::push_f32(out, q.x);
                binary::push_f32(out, q.y);
                binary::push_f32(out, q.z);
                binary::push_f32(out, q.w);
            }
            Property::Matrix3x3(m) => {
                for v in m.to_cols_array() {
                    binary::push_f32(out, v);
                }
            }
            Property::Matrix4x4(m) => {
                for v in m.to_cols_array() {
                    binary::push_f32(out, v);
                }
            }
            Property::Block(block) => block.encode_into(out),
        }
    }

    /// Decode a payload for `code`, at `depth` nested blocks.
    pub(crate) fn decode_payload<R: Read + ?Sized>(
        code: u8,
        r: &mut R,
        depth: usize,
    ) -> Result<Property> {
        let prop = match code {
            CODE_STRING => Property::String(binary::read_string(r)?),
            CODE_INT32 => Property::Int32(binary::read_i32(r)?),
            CODE_BYTE => Property::Byte(binary::read_u8(r)?),
            CODE_FLOAT32 => Property::Float32(binary::read_f32(r)?),
            CODE_BOOL => Property::Bool(binary::read_u8(r)? != 0),
            CODE_VEC2 => Property::Vec2(Vec2::new(binary::read_f32(r)?, binary::read_f32(r)?)),
            CODE_VEC3 => Property::Vec3(Vec3::new(
                binary::read_f32(r)?,
                binary::read_f32(r)?,
                binary::read_f32(r)?,
            )),
            CODE_QUATERNION => Property::Quaternion(Quat::from_xyzw(
                binary::read_f32(r)?,
                binary::read_f32(r)?,
                binary::read_f32(r)?,
                binary::read_f32(r)?,
            )),
            CODE_MATRIX3X3 => {
                let mut cols = [0f32; 9];
                for v in cols.iter_mut() {
                    *v = binary::read_f32(r)?;
                }
                Property::Matrix3x3(Mat3::from_cols_array(&cols))
            }
            CODE_MATRIX4X4 => {
                let mut cols = [0f32; 16];
                for v in cols.iter_mut() {
                    *v = binary::read_f32(r)?;
                }
                Property::Matrix4x4(Mat4::from_cols_array(&cols))
            }
            CODE_BLOCK => Property::Block(Block::decode_at_depth(r, depth + 1)?),
            other => return Err(Error::metadata(format!("unknown property code {other}"))),
        };
        Ok(prop)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::String(value.to_string())
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Property::Int32(value)
    }
}

impl From<f32> for Property {
    fn from(value: f32) -> Self {
        Property::Float32(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}
