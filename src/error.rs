//! Error types for contexts, attribute references and JSON serialization
//!
//! Construction problems are never returned as `Err`: an invalid [`Context`] or
//! [`AttributeRef`] keeps the message text of the violated rule instead. Only
//! the JSON boundary reports failures through [`Result`].
//!
//! [`Context`]: crate::context::Context
//! [`AttributeRef`]: crate::attribute_ref::AttributeRef

use thiserror::Error;

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Reasons an attribute reference string can be rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeRefError {
    /// The string was empty or consisted of a single slash
    #[error("attribute reference cannot be empty")]
    Empty,

    /// A path had an empty component
    #[error("attribute reference contained a double slash or a trailing slash")]
    ExtraSlash,

    /// A `~` was followed by something other than `0` or `1`
    #[error("attribute reference contained an escape character (~) that was not followed by 0 or 1")]
    InvalidEscape,
}

/// Validation rules a context can violate
///
/// The `Display` text of each variant is what an invalid context reports from
/// `Context::error()`. Several violations are joined with `", "`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextError {
    /// Single-kind context without a key
    #[error("context key must not be null or empty")]
    NoKey,

    /// Kind string was empty where one is required
    #[error("context kind must not be empty in JSON")]
    KindCannotBeEmpty,

    /// The literal kind name "kind"
    #[error("\"kind\" is not a valid context kind")]
    KindCannotBeKind,

    /// Kind contains characters outside `[A-Za-z0-9._-]`
    #[error("context kind contains disallowed characters")]
    KindInvalidChars,

    /// The kind "multi" used for a single-kind context
    #[error("context of kind \"multi\" must be created with createMulti or multiBuilder")]
    KindMultiForSingle,

    /// Multi-kind context with no members
    #[error("multi-kind context must contain at least one kind")]
    MultiWithNoKinds,

    /// Multi-kind context containing another multi-kind context
    #[error("multi-kind context cannot contain other multi-kind contexts")]
    MultiWithinMulti,

    /// Multi-kind context with the same kind more than once
    #[error("multi-kind context cannot have same kind more than once")]
    MultiDuplicates,
}

/// Errors raised at the JSON serialize/deserialize boundary
#[derive(Error, Debug)]
pub enum SerializationError {
    /// Malformed JSON text, or a shape rejected by a serde implementation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input described a context that failed validation
    #[error("invalid context: {message}")]
    InvalidContext {
        /// Error text reported by the context
        message: String,
    },

    /// The context cannot be expressed in the requested wire format
    #[error("context cannot be encoded as {format}: {reason}")]
    UnsupportedFormat {
        /// Name of the wire format
        format: &'static str,
        /// What about the context the format cannot carry
        reason: String,
    },

    /// A property had the wrong JSON type
    #[error("property '{property}' must be {expected}")]
    UnexpectedType {
        /// Property name, or a path for nested properties
        property: String,
        /// Description of the accepted JSON types
        expected: &'static str,
    },

    /// A required property was absent
    #[error("missing required property '{property}'")]
    MissingProperty {
        /// Property name
        property: String,
    },
}

impl SerializationError {
    /// Create an invalid context error
    pub fn invalid_context(message: impl Into<String>) -> Self {
        Self::InvalidContext {
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format,
            reason: reason.into(),
        }
    }

    /// Create an unexpected type error
    pub fn unexpected_type(property: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedType {
            property: property.into(),
            expected,
        }
    }

    /// Create a missing property error
    pub fn missing_property(property: impl Into<String>) -> Self {
        Self::MissingProperty {
            property: property.into(),
        }
    }
}
