//! Context JSON encoding
//!
//! Contexts travel through [`Value`] trees. The serde impls on [`Context`]
//! use the standard format; [`crate::json::JsonCodec`] can pick the legacy
//! user format instead.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::builder::ContextBuilder;
use super::context::Context;
use super::kind::ContextKind;
use crate::attribute_ref::AttributeRef;
use crate::config::{ContextFormat, SerializationConfig};
use crate::error::{ContextError, Result, SerializationError};
use crate::model::Value;

const META: &str = "_meta";
const SECONDARY: &str = "secondary";
const PRIVATE_ATTRIBUTES: &str = "privateAttributes";

const LEGACY_CUSTOM: &str = "custom";
const LEGACY_PRIVATE_NAMES: &str = "privateAttributeNames";

/// String attributes a legacy user carries at the top level
const LEGACY_USER_ATTRIBUTES: [&str; 6] = ["ip", "email", "firstName", "lastName", "avatar", "country"];

/// Encode a context in the configured wire format
pub(crate) fn encode(context: &Context, config: &SerializationConfig) -> Result<Value> {
    if let Some(error) = context.error() {
        return Err(SerializationError::invalid_context(error));
    }
    match config.context_format {
        ContextFormat::Standard => Ok(encode_standard(context, config.always_emit_kind)),
        ContextFormat::LegacyUser => encode_legacy(context),
    }
}

/// Decode a context from the configured wire format
///
/// A well-formed encoding of a context that fails validation is an error.
pub(crate) fn decode(value: &Value, config: &SerializationConfig) -> Result<Context> {
    let context = match config.context_format {
        ContextFormat::Standard => decode_standard(value)?,
        ContextFormat::LegacyUser => decode_legacy(value)?,
    };
    match context.error() {
        Some(error) => Err(SerializationError::invalid_context(error)),
        None => Ok(context),
    }
}

/// When a single-kind body writes its `kind` property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindProperty {
    Always,
    NonDefault,
    /// Multi-kind member bodies; the enclosing property name is the kind
    Never,
}

fn encode_standard(context: &Context, always_emit_kind: bool) -> Value {
    if !context.is_multiple() {
        let policy = if always_emit_kind {
            KindProperty::Always
        } else {
            KindProperty::NonDefault
        };
        return encode_single(context, policy);
    }
    let mut out = IndexMap::new();
    out.insert("kind".to_string(), Value::from(ContextKind::MULTI.as_str()));
    for member in context.members() {
        out.insert(member.kind_name().to_string(), encode_single(member, KindProperty::Never));
    }
    Value::object(out)
}

fn encode_single(context: &Context, kind_property: KindProperty) -> Value {
    let mut out = IndexMap::new();
    let Some(single) = context.single() else {
        return Value::object(out);
    };
    let with_kind = match kind_property {
        KindProperty::Always => true,
        KindProperty::NonDefault => !single.kind.is_default(),
        KindProperty::Never => false,
    };
    if with_kind {
        out.insert("kind".to_string(), Value::from(single.kind.as_str()));
    }
    out.insert("key".to_string(), Value::from(single.key.as_str()));
    if let Some(name) = &single.name {
        out.insert("name".to_string(), Value::from(name.as_str()));
    }
    if single.anonymous {
        out.insert("anonymous".to_string(), Value::Bool(true));
    }
    for (name, value) in &single.attributes {
        out.insert(name.clone(), value.clone());
    }

    let mut meta = IndexMap::new();
    if let Some(secondary) = &single.secondary {
        meta.insert(SECONDARY.to_string(), Value::from(secondary.as_str()));
    }
    if !single.private_attributes.is_empty() {
        let refs = single.private_attributes.iter().map(AttributeRef::as_str);
        meta.insert(PRIVATE_ATTRIBUTES.to_string(), Value::array_of(refs));
    }
    if !meta.is_empty() {
        out.insert(META.to_string(), Value::object(meta));
    }
    Value::object(out)
}

fn decode_standard(value: &Value) -> Result<Context> {
    let Value::Object(map) = value else {
        return Err(SerializationError::unexpected_type("context", "an object"));
    };
    let kind = match map.get("kind") {
        None | Some(Value::Null) => ContextKind::DEFAULT,
        Some(Value::String(kind)) if kind.is_empty() => {
            return Ok(Context::failed(ContextError::KindCannotBeEmpty.to_string()));
        }
        Some(Value::String(kind)) => ContextKind::of(kind.as_str()),
        Some(_) => return Err(SerializationError::unexpected_type("kind", "a string")),
    };
    if !kind.is_multi() {
        return decode_single(value, kind, "");
    }

    let mut builder = Context::multi_builder();
    for (name, body) in map.iter().filter(|(name, _)| *name != "kind") {
        if name.is_empty() {
            return Ok(Context::failed(ContextError::KindCannotBeEmpty.to_string()));
        }
        builder.add(decode_single(body, ContextKind::of(name.as_str()), name)?);
    }
    Ok(builder.build())
}

/// Decode one single-kind body; `path` prefixes property names in errors
fn decode_single(value: &Value, kind: ContextKind, path: &str) -> Result<Context> {
    let property = |name: &str| {
        if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}.{name}")
        }
    };
    let Value::Object(map) = value else {
        let name = if path.is_empty() { "context" } else { path };
        return Err(SerializationError::unexpected_type(name, "an object"));
    };

    let mut builder = ContextBuilder::with_kind(kind, "");
    let mut has_key = false;
    for (name, value) in map.iter() {
        match name.as_str() {
            "kind" => {}
            "key" => {
                let key = value
                    .as_str()
                    .ok_or_else(|| SerializationError::unexpected_type(property("key"), "a string"))?;
                builder.key(key);
                has_key = true;
            }
            "name" => match value {
                Value::Null => {}
                Value::String(name) => {
                    builder.name(name.as_str());
                }
                _ => return Err(SerializationError::unexpected_type(property("name"), "a string or null")),
            },
            "anonymous" => match value {
                Value::Null => {}
                Value::Bool(anonymous) => {
                    builder.anonymous(*anonymous);
                }
                _ => {
                    return Err(SerializationError::unexpected_type(
                        property("anonymous"),
                        "a boolean or null",
                    ));
                }
            },
            META => decode_meta(value, &mut builder, &property(META))?,
            _ if value.is_null() => {}
            _ => {
                builder.set(name, value.clone());
            }
        }
    }
    if !has_key {
        return Err(SerializationError::missing_property(property("key")));
    }
    Ok(builder.build())
}

fn decode_meta(value: &Value, builder: &mut ContextBuilder, path: &str) -> Result<()> {
    let map = match value {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        _ => return Err(SerializationError::unexpected_type(path, "an object or null")),
    };
    match map.get(SECONDARY) {
        None | Some(Value::Null) => {}
        Some(Value::String(secondary)) => {
            builder.secondary(Some(secondary.clone()));
        }
        Some(_) => {
            return Err(SerializationError::unexpected_type(
                format!("{path}.{SECONDARY}"),
                "a string or null",
            ));
        }
    }
    let refs = string_array(map.get(PRIVATE_ATTRIBUTES), &format!("{path}.{PRIVATE_ATTRIBUTES}"))?;
    builder.private_attributes(refs);
    Ok(())
}

/// Strings from an optional array property; absent or null is empty
fn string_array<'a>(value: Option<&'a Value>, property: &str) -> Result<Vec<&'a str>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| SerializationError::unexpected_type(property, "an array of strings"))
            })
            .collect(),
        Some(_) => Err(SerializationError::unexpected_type(property, "an array of strings or null")),
    }
}

fn encode_legacy(context: &Context) -> Result<Value> {
    let format = ContextFormat::LegacyUser.name();
    let single = match context.single() {
        Some(single) if single.kind.is_default() => single,
        Some(single) => {
            return Err(SerializationError::unsupported_format(
                format,
                format!("kind \"{}\" is not the default kind", single.kind),
            ));
        }
        None => {
            return Err(SerializationError::unsupported_format(format, "multi-kind context"));
        }
    };

    let mut out = IndexMap::new();
    out.insert("key".to_string(), Value::from(single.key.as_str()));
    if let Some(secondary) = &single.secondary {
        out.insert(SECONDARY.to_string(), Value::from(secondary.as_str()));
    }
    if let Some(name) = &single.name {
        out.insert("name".to_string(), Value::from(name.as_str()));
    }
    if single.anonymous {
        out.insert("anonymous".to_string(), Value::Bool(true));
    }

    let mut custom = IndexMap::new();
    for (name, value) in &single.attributes {
        if value.is_string() && LEGACY_USER_ATTRIBUTES.contains(&name.as_str()) {
            out.insert(name.clone(), value.clone());
        } else {
            custom.insert(name.clone(), value.clone());
        }
    }
    if !custom.is_empty() {
        out.insert(LEGACY_CUSTOM.to_string(), Value::object(custom));
    }
    if !single.private_attributes.is_empty() {
        let names = single
            .private_attributes
            .iter()
            .map(|r| legacy_private_name(r).ok_or(r))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|r| {
                SerializationError::unsupported_format(
                    format,
                    format!("private attribute \"{r}\" is not a literal attribute name"),
                )
            })?;
        out.insert(LEGACY_PRIVATE_NAMES.to_string(), Value::array_of(names));
    }
    Ok(Value::object(out))
}

/// The literal name a private reference is written as in legacy JSON
///
/// `None` when reading the name back would give a different reference, as for
/// paths and for `/name` spellings of plain names.
fn legacy_private_name(r: &AttributeRef) -> Option<&str> {
    if r.depth() != 1 {
        return None;
    }
    let name = r.component(0)?;
    (AttributeRef::from_literal(name) == *r).then_some(name)
}

fn decode_legacy(value: &Value) -> Result<Context> {
    let Value::Object(map) = value else {
        return Err(SerializationError::unexpected_type("user", "an object"));
    };
    let key = match map.get("key") {
        None => return Err(SerializationError::missing_property("key")),
        Some(Value::String(key)) => key.as_str(),
        Some(_) => return Err(SerializationError::unexpected_type("key", "a string")),
    };

    let mut builder = ContextBuilder::new(key);
    for (name, value) in map.iter() {
        match name.as_str() {
            "key" => {}
            "anonymous" => match value {
                Value::Null => {}
                Value::Bool(anonymous) => {
                    builder.anonymous(*anonymous);
                }
                _ => return Err(SerializationError::unexpected_type(name.as_str(), "a boolean or null")),
            },
            SECONDARY | "name" => match value {
                Value::Null => {}
                Value::String(s) if name == SECONDARY => {
                    builder.secondary(Some(s.clone()));
                }
                Value::String(s) => {
                    builder.name(s.as_str());
                }
                _ => return Err(SerializationError::unexpected_type(name.as_str(), "a string or null")),
            },
            attr if LEGACY_USER_ATTRIBUTES.contains(&attr) => match value {
                Value::Null => {}
                Value::String(_) => {
                    builder.set(attr, value.clone());
                }
                _ => return Err(SerializationError::unexpected_type(attr, "a string or null")),
            },
            LEGACY_CUSTOM => match value {
                Value::Null => {}
                Value::Object(custom) => {
                    for (attr, value) in custom.iter() {
                        // Custom attributes never override built-in fields
                        if matches!(attr.as_str(), "kind" | "key" | "name" | "anonymous") {
                            continue;
                        }
                        builder.set(attr, value.clone());
                    }
                }
                _ => return Err(SerializationError::unexpected_type(LEGACY_CUSTOM, "an object or null")),
            },
            LEGACY_PRIVATE_NAMES => {
                let names = string_array(Some(value), LEGACY_PRIVATE_NAMES)?;
                builder.private_attribute_refs(names.into_iter().map(AttributeRef::from_literal));
            }
            _ => {}
        }
    }
    Ok(builder.build())
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self, &SerializationConfig::compact())
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value, &SerializationConfig::compact()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_json(context: &Context, config: &SerializationConfig) -> serde_json::Value {
        let value = encode(context, config).unwrap();
        serde_json::to_value(&value).unwrap()
    }

    fn from_json(json: serde_json::Value, config: &SerializationConfig) -> Result<Context> {
        let value: Value = serde_json::from_value(json).unwrap();
        decode(&value, config)
    }

    #[test]
    fn test_encode_single_with_meta() {
        let c = Context::builder_with_kind(ContextKind::of("org"), "o1")
            .anonymous(true)
            .set("size", 3)
            .secondary(Some("s".to_string()))
            .private_attributes(["size"])
            .build();
        assert_eq!(
            to_json(&c, &SerializationConfig::compact()),
            json!({
                "kind": "org",
                "key": "o1",
                "anonymous": true,
                "size": 3,
                "_meta": {"secondary": "s", "privateAttributes": ["size"]}
            })
        );
    }

    #[test]
    fn test_always_emit_kind() {
        let c = Context::create("u");
        assert_eq!(
            to_json(&c, &SerializationConfig::pretty()),
            json!({"kind": "user", "key": "u"})
        );
    }

    #[test]
    fn test_decode_rejects_bad_types() {
        let config = SerializationConfig::compact();
        assert!(matches!(
            from_json(json!({"key": 3}), &config),
            Err(SerializationError::UnexpectedType { .. })
        ));
        assert!(matches!(
            from_json(json!({"name": "x"}), &config),
            Err(SerializationError::MissingProperty { .. })
        ));
        assert!(matches!(
            from_json(json!({"kind": "multi", "org": {"key": true}}), &config),
            Err(SerializationError::UnexpectedType { property, .. }) if property == "org.key"
        ));
        assert!(matches!(
            from_json(json!({"kind": "", "key": "a"}), &config),
            Err(SerializationError::InvalidContext { .. })
        ));
    }

    #[test]
    fn test_decode_drops_null_attributes() {
        let c = from_json(
            json!({"key": "a", "name": null, "x": null, "_meta": null}),
            &SerializationConfig::compact(),
        )
        .unwrap();
        assert_eq!(c.name(), None);
        assert_eq!(c.custom_attribute_names().count(), 0);
    }

    #[test]
    fn test_legacy_round_trip() {
        let config = SerializationConfig::legacy_user();
        let json = json!({
            "key": "u1",
            "secondary": "s",
            "name": "Bob",
            "email": "bob@example.com",
            "custom": {"level": 3},
            "privateAttributeNames": ["email", "a/b"]
        });
        let c = from_json(json.clone(), &config).unwrap();
        assert!(c.kind().is_some_and(ContextKind::is_default));
        assert_eq!(c.secondary(), Some("s"));
        assert_eq!(c.get_value("level"), Value::from(3));
        assert_eq!(c.private_attribute(1).map(AttributeRef::as_str), Some("/a~1b"));
        assert_eq!(to_json(&c, &config), json);
    }

    #[test]
    fn test_multi_member_bodies_omit_kind() {
        let c = Context::create_multi(&[
            Context::create_with_kind(ContextKind::of("org"), "o"),
            Context::create_with_kind(ContextKind::of("device"), "d"),
        ]);
        for config in [SerializationConfig::compact(), SerializationConfig::pretty()] {
            assert_eq!(
                to_json(&c, &config),
                json!({"kind": "multi", "device": {"key": "d"}, "org": {"key": "o"}})
            );
        }
    }

    #[test]
    fn test_legacy_private_names_must_be_literal() {
        let config = SerializationConfig::legacy_user();
        for path in ["/address/street", "/email", "/a~0b"] {
            let c = Context::builder("u")
                .set("email", "e")
                .private_attributes([path])
                .build();
            assert!(
                matches!(
                    encode(&c, &config),
                    Err(SerializationError::UnsupportedFormat { .. })
                ),
                "{path}"
            );
        }

        let c = Context::builder("u")
            .private_attributes(["email", "~x"])
            .private_attribute_refs([AttributeRef::from_literal("a/b")])
            .build();
        let encoded = to_json(&c, &config);
        assert_eq!(encoded["privateAttributeNames"], json!(["email", "~x", "a/b"]));
        assert_eq!(from_json(encoded, &config).unwrap(), c);
    }

    #[test]
    fn test_legacy_rejects_non_user_kinds() {
        let org = Context::create_with_kind(ContextKind::of("org"), "o");
        assert!(matches!(
            encode(&org, &SerializationConfig::legacy_user()),
            Err(SerializationError::UnsupportedFormat { .. })
        ));
    }
}
