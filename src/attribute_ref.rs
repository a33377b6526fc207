//! Attribute references: names or slash-delimited paths into a context
//!
//! A string that does not start with `/` is a literal attribute name and may
//! contain any characters. A string that starts with `/` is a path whose first
//! component is an attribute name and whose later components are object
//! property names or decimal array indexes. Inside a path component `~1`
//! stands for `/` and `~0` for `~`.
//!
//! ```
//! use flag_context::AttributeRef;
//!
//! let r = AttributeRef::from_path("/address/street~1line/0");
//! assert_eq!(r.depth(), 3);
//! assert_eq!(r.component(1), Some("street/line"));
//! assert_eq!(r.component_as_integer(2), Some(0));
//! ```

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::AttributeRefError;

/// Built-in attribute names plus custom names seen often enough to share
static COMMON_LITERALS: Lazy<FxHashMap<&'static str, AttributeRef>> = Lazy::new(|| {
    let names = [
        // built-ins
        "kind",
        "key",
        "name",
        "anonymous",
        // frequently used custom attributes
        "email",
        "firstName",
        "lastName",
        "country",
        "ip",
        "avatar",
    ];

    names
        .iter()
        .map(|name| (*name, AttributeRef::literal(name, name)))
        .collect()
});

/// A parsed attribute name or path
///
/// Parsing happens once; the result is immutable and cheap to clone. An
/// invalid reference keeps its original text for diagnostics, reports the
/// reason through [`error`](Self::error), and has depth 0.
#[derive(Clone)]
pub struct AttributeRef {
    inner: Arc<Inner>,
}

struct Inner {
    raw_path: String,
    parsed: Result<Path, AttributeRefError>,
}

enum Path {
    /// A single attribute name, already unescaped
    Single(String),
    /// Two or more components
    Components(SmallVec<[Component; 4]>),
}

struct Component {
    name: String,
    as_integer: Option<usize>,
}

impl AttributeRef {
    fn literal(raw_path: &str, name: &str) -> Self {
        Self::new(raw_path.to_string(), Ok(Path::Single(name.to_string())))
    }

    fn failed(raw_path: &str, error: AttributeRefError) -> Self {
        Self::new(raw_path.to_string(), Err(error))
    }

    fn new(raw_path: String, parsed: Result<Path, AttributeRefError>) -> Self {
        Self {
            inner: Arc::new(Inner { raw_path, parsed }),
        }
    }

    /// Parse an attribute reference string
    ///
    /// The result always remembers `path`, even when validation fails, so
    /// `to_string()` and serialization reproduce the input.
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() || path == "/" {
            return Self::failed(path, AttributeRefError::Empty);
        }
        let Some(rest) = path.strip_prefix('/') else {
            // No leading slash: a plain attribute name with no escaping
            return Self::literal(path, path);
        };
        if !rest.contains('/') {
            return match unescape(rest) {
                Ok(name) => Self::new(path.to_string(), Ok(Path::Single(name))),
                Err(e) => Self::failed(path, e),
            };
        }

        let mut components = SmallVec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Self::failed(path, AttributeRefError::ExtraSlash);
            }
            let name = match unescape(part) {
                Ok(name) => name,
                Err(e) => return Self::failed(path, e),
            };
            let as_integer = if part.starts_with(|c: char| c.is_ascii_digit()) {
                part.parse::<usize>().ok()
            } else {
                None
            };
            components.push(Component { name, as_integer });
        }
        Self::new(path.to_string(), Ok(Path::Components(components)))
    }

    /// Treat `name` as one attribute name, never as a path
    ///
    /// Only an empty name is invalid. A name containing `/` is stored in its
    /// escaped path form, so `from_literal("a/b")` renders as `/a~1b`.
    pub fn from_literal(name: &str) -> Self {
        if name.is_empty() {
            return Self::failed("", AttributeRefError::Empty);
        }
        if !name.contains('/') {
            if let Some(shared) = COMMON_LITERALS.get(name) {
                return shared.clone();
            }
            return Self::literal(name, name);
        }
        let escaped = format!("/{}", escape(name));
        Self::new(escaped, Ok(Path::Single(name.to_string())))
    }

    /// True unless parsing failed
    pub fn is_valid(&self) -> bool {
        self.inner.parsed.is_ok()
    }

    /// The reason parsing failed, if it did
    pub fn error(&self) -> Option<AttributeRefError> {
        self.inner.parsed.as_ref().err().copied()
    }

    /// Number of path components; 0 for an invalid reference
    pub fn depth(&self) -> usize {
        match &self.inner.parsed {
            Ok(Path::Single(_)) => 1,
            Ok(Path::Components(c)) => c.len(),
            Err(_) => 0,
        }
    }

    /// The unescaped path component at `index`
    pub fn component(&self, index: usize) -> Option<&str> {
        match &self.inner.parsed {
            Ok(Path::Single(name)) => (index == 0).then_some(name.as_str()),
            Ok(Path::Components(c)) => c.get(index).map(|c| c.name.as_str()),
            Err(_) => None,
        }
    }

    /// The path component at `index` read as a decimal array index
    ///
    /// Single-name references never have an integer form.
    pub fn component_as_integer(&self, index: usize) -> Option<usize> {
        match &self.inner.parsed {
            Ok(Path::Components(c)) => c.get(index).and_then(|c| c.as_integer),
            _ => None,
        }
    }

    /// The reference in `from_path` syntax
    pub fn as_str(&self) -> &str {
        &self.inner.raw_path
    }
}

fn escape(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

fn unescape(part: &str) -> Result<String, AttributeRefError> {
    if !part.contains('~') {
        return Ok(part.to_string());
    }
    let mut out = String::with_capacity(part.len());
    let mut chars = part.chars();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(AttributeRefError::InvalidEscape),
        }
    }
    Ok(out)
}

impl PartialEq for AttributeRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for AttributeRef {}

impl PartialOrd for AttributeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for AttributeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            None => write!(f, "AttributeRef({})", self.as_str()),
            Some(e) => write!(f, "AttributeRef({}, error: {e})", self.as_str()),
        }
    }
}

impl From<&str> for AttributeRef {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}

impl Serialize for AttributeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttributeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(Self::from_path(&path))
    }
}
