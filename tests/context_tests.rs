//! Context construction, validation, and attribute lookup

use flag_context::{AttributeRef, Context, ContextError, ContextKind, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn kind(name: &str) -> ContextKind {
    ContextKind::of(name)
}

fn hash_of(c: &Context) -> u64 {
    let mut hasher = DefaultHasher::new();
    c.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_simple_single_kind() {
    let c = Context::create("a");
    assert!(c.is_valid());
    assert_eq!(c.error(), None);
    assert_eq!(c.kind(), Some(&ContextKind::DEFAULT));
    assert_eq!(c.key(), "a");
    assert_eq!(c.name(), None);
    assert!(!c.is_anonymous());
    assert!(!c.is_multiple());
    assert_eq!(c.fully_qualified_key(), "a");
    assert_eq!(c.individual_context_count(), 1);
    assert!(Context::ptr_eq(c.individual_context(0).unwrap(), &c));
}

#[rstest]
#[case("", "org", ContextError::NoKey)]
#[case("a", "kind", ContextError::KindCannotBeKind)]
#[case("a", "multi", ContextError::KindMultiForSingle)]
#[case("a", "org!", ContextError::KindInvalidChars)]
#[case("a", "a b", ContextError::KindInvalidChars)]
fn test_invalid_single_kind(#[case] key: &str, #[case] kind_name: &str, #[case] expected: ContextError) {
    let c = Context::create_with_kind(kind(kind_name), key);
    assert!(!c.is_valid());
    assert_eq!(c.error(), Some(expected.to_string().as_str()));
}

#[test]
fn test_multi_kind_fully_qualified_key_sorted_by_kind() {
    let c = Context::create_multi(&[
        Context::create_with_kind(kind("user"), "user-1"),
        Context::create_with_kind(kind("org"), "org-1"),
    ]);
    assert!(c.is_valid());
    assert!(c.is_multiple());
    assert_eq!(c.kind(), Some(&ContextKind::MULTI));
    assert_eq!(c.key(), "");
    assert_eq!(c.fully_qualified_key(), "org:org-1:user:user-1");
}

#[test]
fn test_multi_kind_key_is_url_encoded() {
    let c = Context::create_multi(&[
        Context::create("a:b"),
        Context::create_with_kind(kind("org"), "c d"),
    ]);
    assert_eq!(c.fully_qualified_key(), "org:c+d:user:a%3Ab");
}

#[test]
fn test_single_member_multi_is_not_wrapped() {
    let only = Context::create_with_kind(kind("org"), "o");
    let multi = Context::create_multi(std::slice::from_ref(&only));
    assert!(Context::ptr_eq(&multi, &only));

    let built = Context::multi_builder().add(only.clone()).build();
    assert!(Context::ptr_eq(&built, &only));
}

#[test]
fn test_duplicate_kinds_rejected() {
    let c = Context::create_multi(&[
        Context::create_with_kind(kind("org"), "a"),
        Context::create_with_kind(kind("org"), "a2"),
    ]);
    assert!(!c.is_valid());
    assert!(c.error().unwrap().contains(&ContextError::MultiDuplicates.to_string()));
}

#[test]
fn test_nested_multi_rejected() {
    let inner = Context::create_multi(&[Context::create("a"), Context::create_with_kind(kind("org"), "b")]);
    let c = Context::create_multi(&[inner, Context::create_with_kind(kind("device"), "d")]);
    assert_eq!(c.error(), Some(ContextError::MultiWithinMulti.to_string().as_str()));
}

#[test]
fn test_invalid_member_errors_are_joined() {
    let c = Context::multi_builder()
        .add(Context::create(""))
        .add(Context::create_with_kind(kind("kind"), "x"))
        .build();
    let expected = format!("{}, {}", ContextError::NoKey, ContextError::KindCannotBeKind);
    assert_eq!(c.error(), Some(expected.as_str()));
}

#[test]
fn test_empty_multi_rejected() {
    let c = Context::create_multi(&[]);
    assert_eq!(c.error(), Some(ContextError::MultiWithNoKinds.to_string().as_str()));
}

#[test]
fn test_individual_context_lookup() {
    let user = Context::create("u");
    let org = Context::create_with_kind(kind("org"), "o");
    let multi = Context::create_multi(&[user.clone(), org.clone()]);

    assert_eq!(multi.individual_context_count(), 2);
    assert_eq!(multi.individual_context(0), Some(&org));
    assert_eq!(multi.individual_context(1), Some(&user));
    assert_eq!(multi.individual_context(2), None);
    assert_eq!(multi.individual_context_by_kind(&kind("org")), Some(&org));
    assert_eq!(multi.individual_context_by_name(""), Some(&user));
    assert_eq!(multi.individual_context_by_name("device"), None);

    assert_eq!(user.individual_context_by_kind(&ContextKind::DEFAULT), Some(&user));
    assert_eq!(user.individual_context_by_name("org"), None);
}

#[test]
fn test_built_in_attributes_take_precedence() {
    // Setting "name" by attribute name writes the built-in field
    let c = Context::builder("k").name("Alice").set("name", "Bob").build();
    assert_eq!(c.name(), Some("Bob"));
    assert_eq!(c.custom_attribute_names().count(), 0);

    let c = Context::builder("k").name("Alice").build();
    assert_eq!(c.get_value("name"), Value::from("Alice"));
    assert_eq!(c.get_value("kind"), Value::from("user"));
    assert_eq!(c.get_value("key"), Value::from("k"));
    assert_eq!(c.get_value("anonymous"), Value::from(false));
    assert_eq!(c.custom_attribute_names().count(), 0);
}

#[rstest]
#[case("/arr/1", Value::from(20))]
#[case("/arr/5", Value::Null)]
#[case("/arr/x", Value::Null)]
#[case("/obj/a/b", Value::from(true))]
#[case("/obj/a/0", Value::Null)]
#[case("/obj/1", Value::from("one"))]
#[case("/missing/a", Value::Null)]
#[case("/key", Value::from("k"))]
#[case("a/b", Value::from("literal"))]
#[case("//", Value::Null)]
fn test_attribute_path_resolution(#[case] path: &str, #[case] expected: Value) {
    let c = Context::builder("k")
        .set("arr", Value::array_of([10, 20, 30]))
        .set(
            "obj",
            Value::build_object()
                .put("a", Value::build_object().put("b", true).build())
                .put("1", "one")
                .build(),
        )
        .set("a/b", "literal")
        .build();
    assert_eq!(c.get_value_by_ref(&AttributeRef::from_path(path)), expected);
}

#[test]
fn test_literal_reference_to_slash_name() {
    let c = Context::builder("k").set("a/b", 1).build();
    assert_eq!(c.get_value_by_ref(&AttributeRef::from_literal("a/b")), Value::from(1));
}

#[test]
fn test_equality_ignores_attribute_order() {
    let a = Context::builder("k").set("x", 1).set("y", 2).private_attributes(["x", "y"]).build();
    let b = Context::builder("k").set("y", 2).set("x", 1).private_attributes(["y", "x"]).build();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[rstest]
#[case(Context::builder("k").name("n").build())]
#[case(Context::builder("k").anonymous(true).build())]
#[case(Context::builder("k").secondary(Some("s".to_string())).build())]
#[case(Context::builder("k").set("x", 2).build())]
#[case(Context::builder("k").private_attributes(["x"]).build())]
#[case(Context::builder_with_kind(ContextKind::of("org"), "k").build())]
#[case(Context::create("j"))]
fn test_inequality(#[case] other: Context) {
    let base = Context::builder("k").set("x", 1).build();
    assert_ne!(base, other);
}

#[test]
fn test_invalid_contexts_compare_by_error() {
    assert_eq!(Context::create(""), Context::create(""));
    assert_ne!(Context::create(""), Context::create_with_kind(kind("kind"), "a"));
    assert_ne!(Context::create(""), Context::create("a"));
}

#[test]
fn test_multi_equality() {
    let members = [Context::create("u"), Context::create_with_kind(kind("org"), "o")];
    let a = Context::create_multi(&members);
    let b = Context::create_multi(&[members[1].clone(), members[0].clone()]);
    // Members are stored in kind order, so add order does not matter
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_builder_from_context_copies_everything() {
    let original = Context::builder_with_kind(kind("org"), "o")
        .name("Acme")
        .anonymous(true)
        .secondary(Some("2".to_string()))
        .set("tier", "gold")
        .private_attributes(["tier"])
        .build();
    let copy = Context::builder_from_context(&original).build();
    assert_eq!(copy, original);

    let changed = Context::builder_from_context(&original).key("o2").build();
    assert_eq!(changed.key(), "o2");
    assert_eq!(changed.get_value("tier"), Value::from("gold"));
    assert_eq!(original.key(), "o");
}

#[test]
fn test_private_attributes() {
    let c = Context::builder("k")
        .private_attributes(["email", "/address/street"])
        .private_attribute_refs([AttributeRef::from_literal("a/b")])
        .build();
    assert_eq!(c.private_attribute_count(), 3);
    assert_eq!(c.private_attribute(1).map(AttributeRef::depth), Some(2));
    assert_eq!(c.private_attribute(2).map(AttributeRef::as_str), Some("/a~1b"));
    assert_eq!(c.private_attribute(3), None);
}

#[test]
fn test_context_builder_set_by_name() {
    let mut builder = Context::builder("k");
    assert!(builder.try_set("kind", "org"));
    assert!(builder.try_set("key", "o1"));
    assert!(builder.try_set("name", "Acme"));
    assert!(builder.try_set("anonymous", true));
    assert!(builder.try_set("size", 12));
    let c = builder.build();
    assert_eq!(c.kind(), Some(&kind("org")));
    assert_eq!(c.key(), "o1");
    assert_eq!(c.name(), Some("Acme"));
    assert!(c.is_anonymous());
    assert_eq!(c.get_value("size"), Value::from(12));
}
