//! Builder for single-kind contexts

use indexmap::IndexMap;

use super::context::{Context, SingleParts};
use super::kind::ContextKind;
use crate::attribute_ref::AttributeRef;
use crate::model::Value;

/// Mutable staging area for a single-kind [`Context`]
///
/// Setters chain through `&mut Self`. [`build`](Self::build) takes a snapshot,
/// so a builder can keep changing and produce further contexts without
/// affecting the ones it already built. Validation happens only at build time.
///
/// ```
/// use flag_context::{Context, ContextKind};
///
/// let context = Context::builder_with_kind(ContextKind::of("org"), "org-key")
///     .name("Acme")
///     .set("employees", 42)
///     .private_attributes(["employees"])
///     .build();
/// assert!(context.is_valid());
/// assert_eq!(context.get_value("employees").as_int(), 42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    kind: ContextKind,
    key: String,
    name: Option<String>,
    attributes: IndexMap<String, Value>,
    secondary: Option<String>,
    anonymous: bool,
    private_attributes: Vec<AttributeRef>,
}

impl ContextBuilder {
    /// A builder for the default kind
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_kind(ContextKind::DEFAULT, key)
    }

    /// A builder for the given kind
    pub fn with_kind(kind: ContextKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            ..Default::default()
        }
    }

    /// Validate the staged properties and produce a context
    pub fn build(&self) -> Context {
        Context::create_single(SingleParts {
            kind: self.kind.clone(),
            key: self.key.clone(),
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            secondary: self.secondary.clone(),
            anonymous: self.anonymous,
            private_attributes: self.private_attributes.clone(),
        })
    }

    /// Set the kind; an empty name means the default kind
    pub fn kind(&mut self, kind: impl Into<ContextKind>) -> &mut Self {
        self.kind = kind.into();
        self
    }

    /// Set the key, which must be non-empty when building
    pub fn key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = key.into();
        self
    }

    /// Set the display name
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Clear the display name
    pub fn clear_name(&mut self) -> &mut Self {
        self.name = None;
        self
    }

    /// Mark the context as anonymous
    pub fn anonymous(&mut self, anonymous: bool) -> &mut Self {
        self.anonymous = anonymous;
        self
    }

    /// Set the legacy secondary key
    pub fn secondary(&mut self, secondary: Option<String>) -> &mut Self {
        self.secondary = secondary;
        self
    }

    /// Set an attribute, silently ignoring values of the wrong type
    ///
    /// See [`try_set`](Self::try_set) for the rules.
    pub fn set(&mut self, attribute_name: &str, value: impl Into<Value>) -> &mut Self {
        self.try_set(attribute_name, value);
        self
    }

    /// Set an attribute by name, reporting whether it was accepted
    ///
    /// Built-in names route to their typed setters and accept only their own
    /// type: `kind` and `key` take strings, `name` a string or null,
    /// `anonymous` a boolean. `_meta` and the empty name are rejected. Any
    /// other name stores a custom attribute, and `Null` removes it.
    pub fn try_set(&mut self, attribute_name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        match attribute_name {
            "" | "_meta" => false,
            "kind" => match value.as_str() {
                Some(kind) => {
                    self.kind = ContextKind::of(kind);
                    true
                }
                None => false,
            },
            "key" => match value.as_str() {
                Some(key) => {
                    self.key = key.to_string();
                    true
                }
                None => false,
            },
            "name" => match value {
                Value::String(name) => {
                    self.name = Some(name);
                    true
                }
                Value::Null => {
                    self.name = None;
                    true
                }
                _ => false,
            },
            "anonymous" => match value {
                Value::Bool(anonymous) => {
                    self.anonymous = anonymous;
                    true
                }
                _ => false,
            },
            _ => {
                if value.is_null() {
                    self.attributes.shift_remove(attribute_name);
                } else {
                    self.attributes.insert(attribute_name.to_string(), value);
                }
                true
            }
        }
    }

    /// Mark attributes private, each parsed as an attribute reference path
    pub fn private_attributes<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.private_attributes
            .extend(paths.into_iter().map(|p| AttributeRef::from_path(p.as_ref())));
        self
    }

    /// Mark attributes private using already-parsed references
    pub fn private_attribute_refs<I>(&mut self, refs: I) -> &mut Self
    where
        I: IntoIterator<Item = AttributeRef>,
    {
        self.private_attributes.extend(refs);
        self
    }

    /// Replace every staged property with those of `context`
    ///
    /// Copying a multi-kind or invalid context leaves the builder with that
    /// context's kind and an empty key, so building it yields an invalid context.
    pub fn copy_from(&mut self, context: &Context) -> &mut Self {
        match context.single() {
            Some(s) => {
                self.kind = s.kind.clone();
                self.key = s.key.clone();
                self.name = s.name.clone();
                self.attributes = s.attributes.clone();
                self.secondary = s.secondary.clone();
                self.anonymous = s.anonymous;
                self.private_attributes = s.private_attributes.clone();
            }
            None => {
                *self = Self::with_kind(context.kind().cloned().unwrap_or_default(), "");
            }
        }
        self
    }
}
