//! Evaluation contexts and results for feature-flag SDKs
//!
//! This crate holds the data model that flag SDKs share: the JSON [`Value`]
//! type, [`AttributeRef`] paths, single- and multi-kind [`Context`]s with their
//! builders, and the [`EvaluationDetail`]/[`EvaluationReason`] pair that
//! describes a flag result. Everything serializes through [`json`].
//!
//! ```
//! use flag_context::{AttributeRef, Context, ContextKind, Value};
//!
//! let user = Context::builder("user-key")
//!     .name("Alice")
//!     .set("groups", Value::array_of(["beta", "admin"]))
//!     .build();
//! let org = Context::create_with_kind(ContextKind::of("org"), "org-1");
//! let both = Context::create_multi(&[user, org]);
//!
//! assert_eq!(both.fully_qualified_key(), "org:org-1:user:user-key");
//! let user = both.individual_context_by_name("user").unwrap();
//! assert_eq!(
//!     user.get_value_by_ref(&AttributeRef::from_path("/groups/1")),
//!     Value::from("admin")
//! );
//! ```

#![warn(missing_docs)]

pub mod attribute_ref;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluation;
pub mod json;
pub mod model;

// Re-export main types
pub use attribute_ref::AttributeRef;
pub use config::{ContextFormat, SerializationConfig};
pub use context::{Context, ContextBuilder, ContextKind, ContextMultiBuilder};
pub use error::{AttributeRefError, ContextError, Result, SerializationError};
pub use evaluation::{ErrorKind, EvaluationDetail, EvaluationReason, ReasonKind};
pub use json::{JsonCodec, JsonSerializable};
pub use model::{ArrayBuilder, FromValue, Number, ObjectBuilder, Value, ValueType};
