//! Attribute reference parsing

use flag_context::{AttributeRef, AttributeRefError};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("", AttributeRefError::Empty)]
#[case("/", AttributeRefError::Empty)]
#[case("//", AttributeRefError::ExtraSlash)]
#[case("/a//b", AttributeRefError::ExtraSlash)]
#[case("/a/b/", AttributeRefError::ExtraSlash)]
#[case("/a~", AttributeRefError::InvalidEscape)]
#[case("/a~2", AttributeRefError::InvalidEscape)]
#[case("/a/~x", AttributeRefError::InvalidEscape)]
fn test_invalid_paths(#[case] path: &str, #[case] expected: AttributeRefError) {
    let r = AttributeRef::from_path(path);
    assert!(!r.is_valid());
    assert_eq!(r.error(), Some(expected));
    assert_eq!(r.depth(), 0);
    assert_eq!(r.component(0), None);
    assert_eq!(r.to_string(), path);
}

#[rstest]
#[case("name", &["name"])]
#[case("name/with/slashes", &["name/with/slashes"])]
#[case("/name", &["name"])]
#[case("/a/b", &["a", "b"])]
#[case("/a~1b/c~0d", &["a/b", "c~d"])]
#[case("/a/0/b", &["a", "0", "b"])]
fn test_valid_paths(#[case] path: &str, #[case] components: &[&str]) {
    let r = AttributeRef::from_path(path);
    assert!(r.is_valid());
    assert_eq!(r.error(), None);
    assert_eq!(r.depth(), components.len());
    for (i, expected) in components.iter().enumerate() {
        assert_eq!(r.component(i), Some(*expected));
    }
    assert_eq!(r.component(components.len()), None);
    assert_eq!(r.as_str(), path);
}

#[rstest]
#[case("/a/0", Some(0))]
#[case("/a/10", Some(10))]
#[case("/a/01", Some(1))]
#[case("/a/-1", None)]
#[case("/a/x", None)]
#[case("/a/1.5", None)]
fn test_integer_components(#[case] path: &str, #[case] expected: Option<usize>) {
    assert_eq!(AttributeRef::from_path(path).component_as_integer(1), expected);
}

#[test]
fn test_single_component_has_no_integer_form() {
    assert_eq!(AttributeRef::from_path("/0").component_as_integer(0), None);
    assert_eq!(AttributeRef::from_path("0").component_as_integer(0), None);
}

#[test]
fn test_from_literal_escapes_slashes() {
    let r = AttributeRef::from_literal("a/b");
    assert!(r.is_valid());
    assert_eq!(r.to_string(), "/a~1b");
    assert_eq!(r.depth(), 1);
    assert_eq!(r.component(0), Some("a/b"));

    let parsed = AttributeRef::from_path("/a~1b");
    assert_eq!(parsed.component(0), Some("a/b"));
    assert_eq!(parsed, r);
}

#[rstest]
#[case("plain", "plain")]
#[case("/leading", "/~1leading")]
#[case("~tilde/slash", "/~0tilde~1slash")]
#[case("~only", "~only")]
fn test_from_literal_rendering(#[case] name: &str, #[case] rendered: &str) {
    let r = AttributeRef::from_literal(name);
    assert_eq!(r.as_str(), rendered);
    assert_eq!(r.component(0), Some(name));
}

#[test]
fn test_from_literal_is_one_way_for_tilde_names() {
    // "~only" renders unescaped, which from_path reads back verbatim
    let r = AttributeRef::from_literal("~only");
    assert_eq!(AttributeRef::from_path(r.as_str()).component(0), Some("~only"));

    // A leading slash is only a literal through from_literal
    let r = AttributeRef::from_literal("/x");
    assert_ne!(AttributeRef::from_path("/x"), r);
}

#[test]
fn test_from_literal_empty() {
    let r = AttributeRef::from_literal("");
    assert_eq!(r.error(), Some(AttributeRefError::Empty));
}

#[test]
fn test_ordering_and_equality_by_text() {
    let mut refs = vec![
        AttributeRef::from_path("/b"),
        AttributeRef::from_path("a"),
        AttributeRef::from_path("/a"),
    ];
    refs.sort();
    let text: Vec<&str> = refs.iter().map(AttributeRef::as_str).collect();
    assert_eq!(text, vec!["/a", "/b", "a"]);
    assert_ne!(AttributeRef::from_path("a"), AttributeRef::from_path("/a"));
}

#[test]
fn test_serialization_as_string() {
    let r = AttributeRef::from_path("/a/b");
    assert_eq!(serde_json::to_string(&r).unwrap(), r#""/a/b""#);
    let back: AttributeRef = serde_json::from_str(r#""/a/b""#).unwrap();
    assert_eq!(back, r);

    let invalid: AttributeRef = serde_json::from_str(r#""//""#).unwrap();
    assert!(!invalid.is_valid());
    assert!(serde_json::from_str::<AttributeRef>("3").is_err());
}
