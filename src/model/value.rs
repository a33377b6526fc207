//! Core JSON value type for context attributes and flag variations
//!
//! Numbers are exact only within the `i64` range; see [`Number`].

use indexmap::IndexMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::builder::{ArrayBuilder, ObjectBuilder};
use super::number::Number;
use crate::error::Result;

/// Shared `null` returned by lookups that find nothing
static NULL: Value = Value::Null;

/// The JSON type of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// Any numeric value
    Number,
    /// A string
    String,
    /// An ordered sequence of values
    Array,
    /// A mapping of unique names to values
    Object,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// An immutable JSON value
///
/// Arrays and objects are reference counted, so cloning a `Value` never copies
/// its contents. Object equality ignores key order; array equality does not.
///
/// Accessors never fail on a type mismatch. `as_bool` on a string is `false`,
/// `as_int` on an array is `0`, `get` on a number is `Null`, and so on.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// JSON null
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Numeric value
    Number(Number),

    /// String value
    String(String),

    /// Array of values
    Array(Arc<Vec<Value>>),

    /// Object with unique property names
    Object(Arc<IndexMap<String, Value>>),
}

impl Value {
    /// Create an array value from a vector
    pub fn array(values: Vec<Value>) -> Self {
        Self::Array(Arc::new(values))
    }

    /// Create an object value from a map
    pub fn object(map: IndexMap<String, Value>) -> Self {
        Self::Object(Arc::new(map))
    }

    /// Start building an array
    pub fn build_array() -> ArrayBuilder {
        ArrayBuilder::new()
    }

    /// Start building an object
    pub fn build_object() -> ObjectBuilder {
        ObjectBuilder::new()
    }

    /// Parse JSON text into a value
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the JSON type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Object(_) => ValueType::Object,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Check if this value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Check if this value is a number with no fractional part
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_integral())
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Check if this value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Check if this value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The boolean value, or `false` for any other type
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// The string value, or `None` for any other type
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric value as an `i32`, or `0` for any other type
    ///
    /// Fractional values are truncated toward zero.
    pub fn as_int(&self) -> i32 {
        match self {
            Self::Number(n) => n.as_i32(),
            _ => 0,
        }
    }

    /// The numeric value as an `i64`, or `0` for any other type
    pub fn as_long(&self) -> i64 {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => 0,
        }
    }

    /// The numeric value as an `f32`, or `0.0` for any other type
    pub fn as_float(&self) -> f32 {
        self.as_double() as f32
    }

    /// The numeric value as an `f64`, or `0.0` for any other type
    pub fn as_double(&self) -> f64 {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => 0.0,
        }
    }

    /// Number of array elements or object properties; `0` for anything else
    pub fn size(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Array element at `index`, or `Null` if out of range or not an array
    pub fn get_index(&self, index: usize) -> &Value {
        match self {
            Self::Array(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    /// Object property `name`, or `Null` if absent or not an object
    ///
    /// An absent property and a property that is explicitly `null` look the same.
    pub fn get(&self, name: &str) -> &Value {
        match self {
            Self::Object(map) => map.get(name).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    /// Property names of an object; empty for anything else
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let keys = match self {
            Self::Object(map) => Some(map.keys()),
            _ => None,
        };
        keys.into_iter().flatten().map(String::as_str)
    }

    /// Elements of an array or property values of an object; empty otherwise
    pub fn values(&self) -> Values<'_> {
        match self {
            Self::Array(items) => Values::Array(items.iter()),
            Self::Object(map) => Values::Object(map.values()),
            _ => Values::Empty,
        }
    }

    /// Serialize to compact JSON text
    pub fn to_json_string(&self) -> String {
        self.to_string()
    }
}

/// Iterator over the elements of an array or the property values of an object
pub enum Values<'a> {
    /// Scalar values have no elements
    Empty,
    /// Array elements in order
    Array(std::slice::Iter<'a, Value>),
    /// Object values in insertion order
    Object(indexmap::map::Values<'a, String, Value>),
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Empty => None,
            Self::Array(it) => it.next(),
            Self::Object(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Empty => (0, Some(0)),
            Self::Array(it) => it.size_hint(),
            Self::Object(it) => it.size_hint(),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Number(n) => n.hash(state),
            Self::String(s) => s.hash(state),
            Self::Array(items) => {
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Self::Object(map) => {
                // Equality ignores key order, so the hash must too
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                entries.len().hash(state);
                for (name, value) in entries {
                    name.hash(state);
                    value.hash(state);
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// NaN and infinities have no JSON form and become `Null`
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::object(map)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::array(iter.into_iter().map(Into::into).collect())
    }
}

/// Compact JSON text
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(_) | Self::Object(_) => write!(f, "{self}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items.iter()),
            Self::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("any JSON value")
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
                Ok(Value::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
                Ok(Value::from(v))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
                Ok(Value::from(v))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::from(v))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<Value>()? {
                    items.push(item);
                }
                Ok(Value::array(items))
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    map.insert(name, value);
                }
                Ok(Value::object(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
