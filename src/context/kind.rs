//! Context kinds

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

use crate::error::ContextError;

/// The type of entity a context describes, such as `"user"` or `"device"`
///
/// Any string can be wrapped; validity is checked when a context is built,
/// since an invalid kind is reported on the resulting context rather than
/// rejected here.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKind(Cow<'static, str>);

impl ContextKind {
    /// The kind used when none is specified
    pub const DEFAULT: ContextKind = ContextKind(Cow::Borrowed("user"));

    /// The discriminator of a multi-kind context
    pub const MULTI: ContextKind = ContextKind(Cow::Borrowed("multi"));

    /// Wrap a kind name; an empty string means [`ContextKind::DEFAULT`]
    pub fn of(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "" | "user" => Self::DEFAULT,
            "multi" => Self::MULTI,
            _ => Self(Cow::Owned(name)),
        }
    }

    /// True for the default kind
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// True for the multi-kind discriminator
    pub fn is_multi(&self) -> bool {
        *self == Self::MULTI
    }

    /// The kind name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the kind against the rules for a single-kind context
    pub fn validate_as_single_kind(&self) -> Result<(), ContextError> {
        let name = self.as_str();
        if name.is_empty() {
            return Err(ContextError::KindCannotBeEmpty);
        }
        if self.is_multi() {
            return Err(ContextError::KindMultiForSingle);
        }
        if name == "kind" {
            return Err(ContextError::KindCannotBeKind);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ContextError::KindInvalidChars);
        }
        Ok(())
    }
}

impl Default for ContextKind {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextKind({})", self.as_str())
    }
}

impl From<&str> for ContextKind {
    fn from(name: &str) -> Self {
        Self::of(name)
    }
}

impl From<String> for ContextKind {
    fn from(name: String) -> Self {
        Self::of(name)
    }
}

impl Serialize for ContextKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContextKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::of(name))
    }
}
