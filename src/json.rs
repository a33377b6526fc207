//! JSON serialization boundary
//!
//! Every public wire type implements [`JsonSerializable`]. [`serialize`] and
//! [`deserialize`] use the standard formats; a [`JsonCodec`] applies a
//! [`SerializationConfig`] instead.
//!
//! ```
//! use flag_context::json;
//! use flag_context::{Context, EvaluationReason};
//!
//! let context = Context::builder("user-key").name("Alice").set("isAdmin", true).build();
//! let text = json::serialize(&context).unwrap();
//! assert_eq!(text, r#"{"key":"user-key","name":"Alice","isAdmin":true}"#);
//! assert_eq!(json::deserialize::<Context>(&text).unwrap(), context);
//!
//! let reason: EvaluationReason = json::deserialize(r#"{"kind":"OFF"}"#).unwrap();
//! assert_eq!(reason, EvaluationReason::off());
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::attribute_ref::AttributeRef;
use crate::config::SerializationConfig;
use crate::context::codec;
use crate::context::{Context, ContextKind};
use crate::error::Result;
use crate::evaluation::{EvaluationDetail, EvaluationReason};
use crate::model::Value;

/// Types with a defined JSON wire representation
pub trait JsonSerializable: Serialize + DeserializeOwned {}

impl JsonSerializable for Value {}
impl JsonSerializable for AttributeRef {}
impl JsonSerializable for ContextKind {}
impl JsonSerializable for Context {}
impl JsonSerializable for EvaluationReason {}
impl<T: JsonSerializable + Default> JsonSerializable for EvaluationDetail<T> {}

// Scalar flag values, so typed evaluation details serialize too
impl JsonSerializable for bool {}
impl JsonSerializable for i32 {}
impl JsonSerializable for i64 {}
impl JsonSerializable for f64 {}
impl JsonSerializable for String {}

/// Write a value as compact JSON
pub fn serialize<T: JsonSerializable>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Parse JSON text into a value of type `T`
pub fn deserialize<T: JsonSerializable>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// JSON reader and writer driven by a [`SerializationConfig`]
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    config: SerializationConfig,
}

impl JsonCodec {
    /// Create a codec using `config`
    pub fn new(config: SerializationConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &SerializationConfig {
        &self.config
    }

    /// Write any serializable value, honoring the pretty-print setting
    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Parse any deserializable value
    pub fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write a context in the configured wire format
    pub fn serialize_context(&self, context: &Context) -> Result<String> {
        let value = codec::encode(context, &self.config)?;
        self.serialize(&value)
    }

    /// Read a context from the configured wire format
    pub fn deserialize_context(&self, json: &str) -> Result<Context> {
        let value = Value::parse(json)?;
        let context = codec::decode(&value, &self.config)?;
        log::trace!("decoded context {}", context.fully_qualified_key());
        Ok(context)
    }
}
