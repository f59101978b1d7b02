// src/bind/value.rs

use crate::types::Value;

/// A Rust type a decoded [`Value`] can be assigned to.
pub trait FromValue: Sized {
    /// Name of the destination type, for mismatch diagnostics.
    const EXPECTED: &'static str;

    /// `None` when the value's kind cannot be stored in `Self`.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty => $($variant:ident)|+) => {
        impl FromValue for $ty {
            const EXPECTED: &'static str = stringify!($ty);

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    $(Value::$variant(v))|+ => Some(v.to_owned()),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(i64 => Int | Int64);
impl_from_value!(i8 => Int8);
impl_from_value!(i16 => Int16);
impl_from_value!(i32 => Int32);
impl_from_value!(u64 => Uint | Uint64);
impl_from_value!(u8 => Uint8);
impl_from_value!(u16 => Uint16);
impl_from_value!(u32 => Uint32);
impl_from_value!(f32 => Float32);
impl_from_value!(f64 => Float64);
impl_from_value!(String => String);

impl FromValue for Value {
    const EXPECTED: &'static str = "Value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
