// src/types.rs

//! Scalar type registry: the closed set of column types an archive header may
//! declare, the dynamically typed [`Value`] a cell decodes into, and the
//! coercion rules between the two.

use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::CoerceError;

/// One of the scalar kinds a column can be annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl ScalarType {
    /// Every registered type, in the order they are documented.
    pub const ALL: [ScalarType; 13] = [
        ScalarType::Int,
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::Uint,
        ScalarType::Uint8,
        ScalarType::Uint16,
        ScalarType::Uint32,
        ScalarType::Uint64,
        ScalarType::Float32,
        ScalarType::Float64,
        ScalarType::String,
    ];

    /// The tag as written in a header annotation.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint => "uint",
            ScalarType::Uint8 => "uint8",
            ScalarType::Uint16 => "uint16",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
        }
    }

    /// The Rust type a value of this kind is stored as.
    pub fn rust_type(self) -> &'static str {
        match self {
            ScalarType::Int | ScalarType::Int64 => "i64",
            ScalarType::Int8 => "i8",
            ScalarType::Int16 => "i16",
            ScalarType::Int32 => "i32",
            ScalarType::Uint | ScalarType::Uint64 => "u64",
            ScalarType::Uint8 => "u8",
            ScalarType::Uint16 => "u16",
            ScalarType::Uint32 => "u32",
            ScalarType::Float32 => "f32",
            ScalarType::Float64 => "f64",
            ScalarType::String => "String",
        }
    }

    /// Decode an already trimmed cell as this type.
    pub fn coerce(self, cell: &str) -> Result<Value, CoerceError> {
        let value = match self {
            ScalarType::Int => parse_int(cell, 64).map(Value::Int),
            ScalarType::Int8 => parse_int(cell, 8).map(|i| Value::Int8(i as i8)),
            ScalarType::Int16 => parse_int(cell, 16).map(|i| Value::Int16(i as i16)),
            ScalarType::Int32 => parse_int(cell, 32).map(|i| Value::Int32(i as i32)),
            ScalarType::Int64 => parse_int(cell, 64).map(Value::Int64),
            ScalarType::Uint => parse_uint(cell, 64).map(Value::Uint),
            ScalarType::Uint8 => parse_uint(cell, 8).map(|u| Value::Uint8(u as u8)),
            ScalarType::Uint16 => parse_uint(cell, 16).map(|u| Value::Uint16(u as u16)),
            ScalarType::Uint32 => parse_uint(cell, 32).map(|u| Value::Uint32(u as u32)),
            ScalarType::Uint64 => parse_uint(cell, 64).map(Value::Uint64),
            ScalarType::Float32 => cell
                .parse::<f32>()
                .ok()
                .filter(|f| !f.is_infinite() || is_infinity_literal(cell))
                .map(Value::Float32),
            ScalarType::Float64 => cell
                .parse::<f64>()
                .ok()
                .filter(|f| !f.is_infinite() || is_infinity_literal(cell))
                .map(Value::Float64),
            ScalarType::String => Some(Value::String(cell.to_string())),
        };

        value.ok_or_else(|| CoerceError {
            value: cell.to_string(),
            ty: self,
        })
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or(())
    }
}

/// A decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
}

impl Value {
    /// The scalar kind this value was decoded as.
    pub fn ty(&self) -> ScalarType {
        match self {
            Value::Int(_) => ScalarType::Int,
            Value::Int8(_) => ScalarType::Int8,
            Value::Int16(_) => ScalarType::Int16,
            Value::Int32(_) => ScalarType::Int32,
            Value::Int64(_) => ScalarType::Int64,
            Value::Uint(_) => ScalarType::Uint,
            Value::Uint8(_) => ScalarType::Uint8,
            Value::Uint16(_) => ScalarType::Uint16,
            Value::Uint32(_) => ScalarType::Uint32,
            Value::Uint64(_) => ScalarType::Uint64,
            Value::Float32(_) => ScalarType::Float32,
            Value::Float64(_) => ScalarType::Float64,
            Value::String(_) => ScalarType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Serializes as the bare scalar. JSON has no non-finite numbers, so NaN and
/// the infinities are written as the strings `"NaN"`, `"inf"` and `"-inf"`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(v) | Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Int8(v) => serializer.serialize_i8(*v),
            Value::Int16(v) => serializer.serialize_i16(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Uint(v) | Value::Uint64(v) => serializer.serialize_u64(*v),
            Value::Uint8(v) => serializer.serialize_u8(*v),
            Value::Uint16(v) => serializer.serialize_u16(*v),
            Value::Uint32(v) => serializer.serialize_u32(*v),
            Value::Float32(v) if !v.is_finite() => serializer.serialize_str(non_finite(f64::from(*v))),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) if !v.is_finite() => serializer.serialize_str(non_finite(*v)),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
        }
    }
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v > 0.0 {
        "inf"
    } else {
        "-inf"
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) | Value::Int64(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Uint(v) | Value::Uint64(v) => write!(f, "{}", v),
            Value::Uint8(v) => write!(f, "{}", v),
            Value::Uint16(v) => write!(f, "{}", v),
            Value::Uint32(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
        }
    }
}

/// Signed integer literal limited to `bits` of width.
///
/// Accepts an optional sign followed by a decimal, `0x`, `0o`, `0b` or
/// leading-zero octal literal. Underscores may separate digits.
fn parse_int(s: &str, bits: u32) -> Option<i64> {
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(body)?;
    let limit = 1u64 << (bits - 1);

    if negative {
        (magnitude <= limit).then(|| 0i64.wrapping_sub(magnitude as i64))
    } else {
        (magnitude < limit).then_some(magnitude as i64)
    }
}

/// Unsigned integer literal limited to `bits` of width. No sign is allowed.
fn parse_uint(s: &str, bits: u32) -> Option<u64> {
    let value = parse_magnitude(s)?;
    (bits == 64 || value < 1u64 << bits).then_some(value)
}

fn parse_magnitude(s: &str) -> Option<u64> {
    let (radix, digits) = match s.as_bytes() {
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'x') => (16, &s[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'o') => (8, &s[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'b') => (2, &s[2..]),
        [b'0', ..] => (8, &s[1..]),
        [] => return None,
        _ => (10, s),
    };
    if !underscores_ok(s) {
        return None;
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() {
        // a lone "0"
        return Some(0);
    }
    // from_str_radix would otherwise accept a sign here
    if !cleaned.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(&cleaned, radix).ok()
}

/// Underscores must sit between digits (a base prefix counts as a digit).
fn underscores_ok(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut hex = false;
    // '^' start, '0' digit, '_' underscore, '!' anything else
    let mut saw = b'^';

    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        i = 2;
        saw = b'0';
        hex = bytes[1].eq_ignore_ascii_case(&b'x');
    }

    for &b in &bytes[i..] {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = b'0';
        } else if b == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
        } else {
            if saw == b'_' {
                return false;
            }
            saw = b'!';
        }
    }
    saw != b'_'
}

fn is_infinity_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity")
}
