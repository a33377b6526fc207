//! Typed conversions between [`Value`] and Rust scalars

use indexmap::IndexMap;

use super::value::Value;

/// Extraction of a typed scalar from a [`Value`]
///
/// `Null` converts to `None`. Any other value is coerced with the matching
/// accessor, so a string read as `i32` yields `Some(0)`. `String` is the
/// exception: non-string values give `None`.
pub trait FromValue: Sized {
    /// Convert a value, or `None` for `Null`
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        (!value.is_null()).then(|| value.as_bool())
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        (!value.is_null()).then(|| value.as_int())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        (!value.is_null()).then(|| value.as_long())
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        (!value.is_null()).then(|| value.as_float())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        (!value.is_null()).then(|| value.as_double())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Value {
    /// Build an array value from any sequence of convertible items
    pub fn array_of<T, I>(items: I) -> Value
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        items.into_iter().collect()
    }

    /// Build an object value from name/value pairs
    pub fn object_from<K, T, I>(entries: I) -> Value
    where
        K: Into<String>,
        T: Into<Value>,
        I: IntoIterator<Item = (K, T)>,
    {
        let map: IndexMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Value::object(map)
    }

    /// Elements (or object values) converted to `T`
    pub fn values_as<'a, T: FromValue + 'a>(&'a self) -> impl Iterator<Item = Option<T>> + 'a {
        self.values().map(T::from_value)
    }

    /// Convert this value to `T`
    pub fn to_typed<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }
}
