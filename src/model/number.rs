//! Numeric payload for JSON values
//!
//! JSON has a single number type. Integers in the `i64` range are kept exactly;
//! everything else is stored as a double. Unsigned integers above `i64::MAX`
//! therefore lose precision: `18446744073709551615` reads back as
//! `1.8446744073709552e19`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A JSON number that keeps integer exactness when it can
#[derive(Clone, Copy)]
pub struct Number(N);

#[derive(Clone, Copy)]
enum N {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Create a number from an integer
    pub const fn from_i64(value: i64) -> Self {
        Self(N::Int(value))
    }

    /// Create a number from a double, or `None` when it is NaN or infinite
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(N::Float(value)))
        } else {
            None
        }
    }

    /// Create a number from an unsigned integer
    ///
    /// Values above `i64::MAX` lose exactness and are stored as doubles.
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Self(N::Int(i)),
            Err(_) => Self(N::Float(value as f64)),
        }
    }

    /// True if the value has no fractional part
    pub fn is_integral(&self) -> bool {
        match self.0 {
            N::Int(_) => true,
            N::Float(f) => f.fract() == 0.0,
        }
    }

    /// The value as an `i64`, truncating any fractional part
    pub fn as_i64(&self) -> i64 {
        match self.0 {
            N::Int(i) => i,
            N::Float(f) => f as i64,
        }
    }

    /// The value as an `i32`
    ///
    /// Integers outside the `i32` range wrap; doubles saturate.
    pub fn as_i32(&self) -> i32 {
        match self.0 {
            N::Int(i) => i as i32,
            N::Float(f) => f as i32,
        }
    }

    /// The value as an `f64`
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::Int(i) => i as f64,
            N::Float(f) => f,
        }
    }

    // An integral double that fits in i64 behaves exactly like that integer for
    // equality, hashing and output.
    fn exact_integer(&self) -> Option<i64> {
        match self.0 {
            N::Int(i) => Some(i),
            N::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            N::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.exact_integer(), other.exact_integer()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.as_f64() == other.as_f64(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.exact_integer(), other.exact_integer()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.exact_integer() {
            Some(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            None => {
                1u8.hash(state);
                self.as_f64().to_bits().hash(state);
            }
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exact_integer() {
            Some(i) => write!(f, "{i}"),
            None => write!(f, "{}", self.as_f64()),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.exact_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.as_f64()),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumberVisitor;

        impl serde::de::Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Number, E> {
                Ok(Number::from_i64(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Number, E> {
                Ok(Number::from_u64(v))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Number, E> {
                Number::from_f64(v).ok_or_else(|| E::custom("number must be finite"))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::from_i64(value.into())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::from_i64(value.into())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}
