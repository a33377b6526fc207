//! The immutable evaluation context

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::form_urlencoded;

use super::builder::ContextBuilder;
use super::kind::ContextKind;
use super::multi_builder::ContextMultiBuilder;
use crate::attribute_ref::AttributeRef;
use crate::error::ContextError;
use crate::model::Value;

/// A set of attributes that flag evaluations are made for
///
/// A context is one of three shapes:
///
/// * single-kind: a kind, a non-empty key, and optional attributes
/// * multi-kind: two or more single-kind contexts of distinct kinds
/// * invalid: only an error message, produced when validation fails
///
/// Construction never fails outright. Check [`is_valid`](Self::is_valid) or
/// [`error`](Self::error); accessors on an invalid context return empty or
/// `Null` results. Contexts are immutable and cheap to clone.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Repr>,
}

enum Repr {
    Invalid(String),
    Single(Single),
    Multi(Multi),
}

pub(crate) struct Single {
    pub(crate) kind: ContextKind,
    pub(crate) key: String,
    pub(crate) fully_qualified_key: String,
    pub(crate) name: Option<String>,
    pub(crate) attributes: IndexMap<String, Value>,
    pub(crate) secondary: Option<String>,
    pub(crate) anonymous: bool,
    pub(crate) private_attributes: Vec<AttributeRef>,
}

struct Multi {
    contexts: Vec<Context>,
    fully_qualified_key: String,
}

/// Fields staged for a single-kind context
pub(crate) struct SingleParts {
    pub(crate) kind: ContextKind,
    pub(crate) key: String,
    pub(crate) name: Option<String>,
    pub(crate) attributes: IndexMap<String, Value>,
    pub(crate) secondary: Option<String>,
    pub(crate) anonymous: bool,
    pub(crate) private_attributes: Vec<AttributeRef>,
}

static MULTI_KIND: ContextKind = ContextKind::MULTI;

fn url_encode_key(key: &str) -> String {
    form_urlencoded::byte_serialize(key.as_bytes()).collect()
}

impl Context {
    fn from_repr(repr: Repr) -> Self {
        Self {
            inner: Arc::new(repr),
        }
    }

    /// An invalid context carrying `error`
    pub(crate) fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        log::debug!("context construction failed: {error}");
        Self::from_repr(Repr::Invalid(error))
    }

    pub(crate) fn create_single(parts: SingleParts) -> Self {
        if let Err(e) = parts.kind.validate_as_single_kind() {
            return Self::failed(e.to_string());
        }
        if parts.key.is_empty() {
            return Self::failed(ContextError::NoKey.to_string());
        }
        let fully_qualified_key = if parts.kind.is_default() {
            parts.key.clone()
        } else {
            format!("{}:{}", parts.kind, url_encode_key(&parts.key))
        };
        Self::from_repr(Repr::Single(Single {
            kind: parts.kind,
            key: parts.key,
            fully_qualified_key,
            name: parts.name,
            attributes: parts.attributes,
            secondary: parts.secondary,
            anonymous: parts.anonymous,
            private_attributes: parts.private_attributes,
        }))
    }

    /// Validate and assemble a multi-kind context, taking ownership of the members
    ///
    /// Does not handle the zero- and one-member cases; callers do.
    fn create_multi_internal(mut contexts: Vec<Context>) -> Self {
        let mut errors: Vec<String> = Vec::new();
        let mut nested_multi = false;
        let mut duplicates = false;

        for (i, c) in contexts.iter().enumerate() {
            match &*c.inner {
                Repr::Invalid(error) => errors.push(error.clone()),
                Repr::Multi(_) => nested_multi = true,
                Repr::Single(single) => {
                    // Member counts are small, so a pairwise scan is fine
                    if contexts[..i]
                        .iter()
                        .any(|other| other.kind() == Some(&single.kind))
                    {
                        duplicates = true;
                    }
                }
            }
        }
        if nested_multi {
            errors.push(ContextError::MultiWithinMulti.to_string());
        }
        if duplicates {
            errors.push(ContextError::MultiDuplicates.to_string());
        }
        if !errors.is_empty() {
            return Self::failed(errors.join(", "));
        }

        contexts.sort_by(|a, b| a.kind_name().cmp(b.kind_name()));
        let fully_qualified_key = contexts
            .iter()
            .map(|c| format!("{}:{}", c.kind_name(), url_encode_key(c.key())))
            .collect::<Vec<_>>()
            .join(":");
        Self::from_repr(Repr::Multi(Multi {
            contexts,
            fully_qualified_key,
        }))
    }

    /// A single-kind context of the default kind with only a key
    pub fn create(key: impl Into<String>) -> Self {
        Self::create_with_kind(ContextKind::DEFAULT, key)
    }

    /// A single-kind context with only a kind and key
    pub fn create_with_kind(kind: ContextKind, key: impl Into<String>) -> Self {
        ContextBuilder::with_kind(kind, key).build()
    }

    /// Combine single-kind contexts into a multi-kind context
    ///
    /// No members gives an invalid context. One member is returned as is,
    /// never wrapped.
    pub fn create_multi(contexts: &[Context]) -> Self {
        match contexts {
            [] => Self::failed(ContextError::MultiWithNoKinds.to_string()),
            [only] => only.clone(),
            _ => Self::create_multi_internal(contexts.to_vec()),
        }
    }

    /// Start building a single-kind context of the default kind
    pub fn builder(key: impl Into<String>) -> ContextBuilder {
        ContextBuilder::new(key)
    }

    /// Start building a single-kind context of the given kind
    pub fn builder_with_kind(kind: ContextKind, key: impl Into<String>) -> ContextBuilder {
        ContextBuilder::with_kind(kind, key)
    }

    /// Start building from a copy of an existing context's properties
    pub fn builder_from_context(context: &Context) -> ContextBuilder {
        let mut builder = ContextBuilder::new("");
        builder.copy_from(context);
        builder
    }

    /// Start building a multi-kind context
    pub fn multi_builder() -> ContextMultiBuilder {
        ContextMultiBuilder::new()
    }

    /// True unless construction failed
    pub fn is_valid(&self) -> bool {
        !matches!(&*self.inner, Repr::Invalid(_))
    }

    /// The validation failure message, if construction failed
    pub fn error(&self) -> Option<&str> {
        match &*self.inner {
            Repr::Invalid(error) => Some(error),
            _ => None,
        }
    }

    /// The kind; [`ContextKind::MULTI`] for a multi-kind context, `None` if invalid
    pub fn kind(&self) -> Option<&ContextKind> {
        match &*self.inner {
            Repr::Invalid(_) => None,
            Repr::Single(s) => Some(&s.kind),
            Repr::Multi(_) => Some(&MULTI_KIND),
        }
    }

    pub(crate) fn kind_name(&self) -> &str {
        self.kind().map_or("", ContextKind::as_str)
    }

    /// True for a multi-kind context
    pub fn is_multiple(&self) -> bool {
        matches!(&*self.inner, Repr::Multi(_))
    }

    /// The key; empty for multi-kind and invalid contexts
    pub fn key(&self) -> &str {
        self.single().map_or("", |s| s.key.as_str())
    }

    /// The display name, if set
    pub fn name(&self) -> Option<&str> {
        self.single().and_then(|s| s.name.as_deref())
    }

    /// True if the context is marked anonymous
    pub fn is_anonymous(&self) -> bool {
        self.single().is_some_and(|s| s.anonymous)
    }

    /// The legacy secondary key, if set
    pub fn secondary(&self) -> Option<&str> {
        self.single().and_then(|s| s.secondary.as_deref())
    }

    /// Canonical key identifying the context across kinds
    ///
    /// The plain key for the default kind, `kind:key` otherwise (with the key
    /// URL-encoded), and for a multi-kind context every member's `kind:key`
    /// sorted by kind and joined with `:`. Empty if invalid.
    pub fn fully_qualified_key(&self) -> &str {
        match &*self.inner {
            Repr::Invalid(_) => "",
            Repr::Single(s) => &s.fully_qualified_key,
            Repr::Multi(m) => &m.fully_qualified_key,
        }
    }

    /// Look up a top-level attribute by name, with no path interpretation
    ///
    /// `kind`, `key`, `name` and `anonymous` always read the built-in fields.
    /// A multi-kind context only answers `kind`. Absent attributes are `Null`.
    pub fn get_value(&self, attribute_name: &str) -> Value {
        match &*self.inner {
            Repr::Invalid(_) => Value::Null,
            Repr::Multi(_) if attribute_name == "kind" => Value::from(ContextKind::MULTI.as_str()),
            Repr::Multi(_) => Value::Null,
            Repr::Single(s) => s.top_level_attribute(attribute_name),
        }
    }

    /// Resolve an attribute reference, descending into arrays and objects
    ///
    /// An invalid reference, a missing attribute, or any dead end along the
    /// path gives `Null`.
    pub fn get_value_by_ref(&self, attribute_ref: &AttributeRef) -> Value {
        let Some(first) = attribute_ref.component(0) else {
            return Value::Null;
        };
        let single = match &*self.inner {
            Repr::Invalid(_) => return Value::Null,
            Repr::Multi(_) => {
                return if attribute_ref.depth() == 1 && first == "kind" {
                    Value::from(ContextKind::MULTI.as_str())
                } else {
                    Value::Null
                };
            }
            Repr::Single(s) => s,
        };

        let mut value = single.top_level_attribute(first);
        for i in 1..attribute_ref.depth() {
            if value.is_null() {
                break;
            }
            let next = match (attribute_ref.component_as_integer(i), &value) {
                (Some(index), Value::Array(_)) => value.get_index(index),
                _ => value.get(attribute_ref.component(i).unwrap_or_default()),
            };
            value = next.clone();
        }
        value
    }

    /// Names of the custom attributes, excluding built-ins
    pub fn custom_attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.single()
            .into_iter()
            .flat_map(|s| s.attributes.keys().map(String::as_str))
    }

    /// Number of single-kind contexts within this one
    ///
    /// 1 for a single-kind context, the member count for a multi-kind one, 0 if invalid.
    pub fn individual_context_count(&self) -> usize {
        match &*self.inner {
            Repr::Invalid(_) => 0,
            Repr::Single(_) => 1,
            Repr::Multi(m) => m.contexts.len(),
        }
    }

    /// The single-kind context at `index`, in kind order
    pub fn individual_context(&self, index: usize) -> Option<&Context> {
        match &*self.inner {
            Repr::Invalid(_) => None,
            Repr::Single(_) => (index == 0).then_some(self),
            Repr::Multi(m) => m.contexts.get(index),
        }
    }

    /// The single-kind context of the given kind
    pub fn individual_context_by_kind(&self, kind: &ContextKind) -> Option<&Context> {
        self.individual_context_by_name(kind.as_str())
    }

    /// The single-kind context whose kind is named `kind`; empty means the default kind
    pub fn individual_context_by_name(&self, kind: &str) -> Option<&Context> {
        let kind = if kind.is_empty() {
            ContextKind::DEFAULT.as_str()
        } else {
            kind
        };
        match &*self.inner {
            Repr::Invalid(_) => None,
            Repr::Single(s) => (s.kind.as_str() == kind).then_some(self),
            Repr::Multi(m) => m.contexts.iter().find(|c| c.kind_name() == kind),
        }
    }

    /// Number of attributes marked private
    pub fn private_attribute_count(&self) -> usize {
        self.private_attributes().len()
    }

    /// The private attribute reference at `index`
    pub fn private_attribute(&self, index: usize) -> Option<&AttributeRef> {
        self.private_attributes().get(index)
    }

    /// All attribute references marked private
    pub fn private_attributes(&self) -> &[AttributeRef] {
        match self.single() {
            Some(s) => &s.private_attributes,
            None => &[],
        }
    }

    /// True if both handles point at the same immutable context
    pub fn ptr_eq(a: &Context, b: &Context) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn single(&self) -> Option<&Single> {
        match &*self.inner {
            Repr::Single(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn members(&self) -> &[Context] {
        match &*self.inner {
            Repr::Multi(m) => &m.contexts,
            _ => &[],
        }
    }
}

impl Single {
    fn top_level_attribute(&self, name: &str) -> Value {
        match name {
            "kind" => Value::from(self.kind.as_str()),
            "key" => Value::from(self.key.as_str()),
            "name" => Value::from(self.name.as_deref()),
            "anonymous" => Value::from(self.anonymous),
            _ => self.attributes.get(name).cloned().unwrap_or_default(),
        }
    }

    fn private_attributes_match(&self, other: &Single) -> bool {
        let (a, b) = (&self.private_attributes, &other.private_attributes);
        a.len() == b.len() && a.iter().all(|r| b.contains(r)) && b.iter().all(|r| a.contains(r))
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        match (&*self.inner, &*other.inner) {
            (Repr::Invalid(a), Repr::Invalid(b)) => a == b,
            // Members are compared positionally; each side is already in kind order
            (Repr::Multi(a), Repr::Multi(b)) => a.contexts == b.contexts,
            (Repr::Single(a), Repr::Single(b)) => {
                a.kind == b.kind
                    && a.key == b.key
                    && a.name == b.name
                    && a.anonymous == b.anonymous
                    && a.secondary == b.secondary
                    && a.attributes == b.attributes
                    && a.private_attributes_match(b)
            }
            _ => false,
        }
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &*self.inner {
            Repr::Invalid(error) => {
                0u8.hash(state);
                error.hash(state);
            }
            Repr::Multi(m) => {
                1u8.hash(state);
                m.contexts.len().hash(state);
                for c in &m.contexts {
                    c.hash(state);
                }
            }
            Repr::Single(s) => {
                2u8.hash(state);
                s.kind.hash(state);
                s.key.hash(state);
                s.name.hash(state);
                s.anonymous.hash(state);
                s.secondary.hash(state);

                // Attribute and private-attribute comparisons ignore order
                let mut attributes: Vec<(&String, &Value)> = s.attributes.iter().collect();
                attributes.sort_by(|a, b| a.0.cmp(b.0));
                for (name, value) in attributes {
                    name.hash(state);
                    value.hash(state);
                }
                let mut refs: Vec<&AttributeRef> = s.private_attributes.iter().collect();
                refs.sort();
                refs.dedup();
                for r in refs {
                    r.hash(state);
                }
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            Repr::Invalid(error) => write!(f, "Context(invalid: {error})"),
            _ => match crate::json::serialize(self) {
                Ok(json) => write!(f, "Context({json})"),
                Err(_) => write!(f, "Context({})", self.fully_qualified_key()),
            },
        }
    }
}

/// The JSON representation, or the error text for an invalid context
impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            Some(error) => write!(f, "(invalid context: {error})"),
            None => {
                let json = crate::json::serialize(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}
