//! Serialization configuration options

/// Wire shape used for contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextFormat {
    /// Built-in fields and custom attributes at the top level, with `_meta`
    /// for the secondary key and private attributes; multi-kind contexts
    /// nest one body per kind
    #[default]
    Standard,

    /// Flat legacy user objects: built-in user attributes at the top level,
    /// other attributes under `custom`, private names in
    /// `privateAttributeNames`. Only default-kind single contexts can be
    /// written this way.
    LegacyUser,
}

impl ContextFormat {
    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard context JSON",
            Self::LegacyUser => "legacy user JSON",
        }
    }
}

/// Configuration for JSON encoding and decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationConfig {
    /// Wire shape for contexts, both directions
    pub context_format: ContextFormat,

    /// Whether to emit indented JSON
    pub pretty: bool,

    /// Whether standard-format contexts of the default kind still write
    /// `"kind":"user"`
    pub always_emit_kind: bool,
}

impl SerializationConfig {
    /// Create a configuration with custom settings
    pub fn new(context_format: ContextFormat, pretty: bool) -> Self {
        Self {
            context_format,
            pretty,
            always_emit_kind: false,
        }
    }

    /// Single-line standard JSON with the default kind omitted
    pub fn compact() -> Self {
        Self::new(ContextFormat::Standard, false)
    }

    /// Indented standard JSON with every kind spelled out, for logs and fixtures
    pub fn pretty() -> Self {
        Self {
            context_format: ContextFormat::Standard,
            pretty: true,
            always_emit_kind: true,
        }
    }

    /// Single-line legacy user JSON
    pub fn legacy_user() -> Self {
        Self::new(ContextFormat::LegacyUser, false)
    }
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self::compact()
    }
}
