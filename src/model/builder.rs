//! Incremental builders for array and object values
//!
//! Both builders keep their contents behind an `Arc` and hand out that same
//! `Arc` from `build()`. The next mutation goes through `Arc::make_mut`, which
//! clones the contents only while an earlier snapshot is still alive, so a
//! built value never changes afterwards.

use indexmap::IndexMap;
use std::sync::Arc;

use super::value::Value;

/// Builder for array values
#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    items: Arc<Vec<Value>>,
}

impl ArrayBuilder {
    /// Create an empty array builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        Arc::make_mut(&mut self.items).push(value.into());
        self
    }

    /// Number of values added so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing has been added
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot the current contents as an array value
    pub fn build(&self) -> Value {
        Value::Array(Arc::clone(&self.items))
    }
}

/// Builder for object values
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    map: Arc<IndexMap<String, Value>>,
}

impl ObjectBuilder {
    /// Create an empty object builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the properties of an existing object value
    ///
    /// Non-object values contribute nothing.
    pub fn copy_from(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                map: Arc::clone(map),
            },
            _ => Self::default(),
        }
    }

    /// Set a property, replacing any previous value for the same name
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        Arc::make_mut(&mut self.map).insert(name.into(), value.into());
        self
    }

    /// Remove a property if present
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if self.map.contains_key(name) {
            Arc::make_mut(&mut self.map).shift_remove(name);
        }
        self
    }

    /// Number of properties set so far
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no properties are set
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Snapshot the current contents as an object value
    pub fn build(&self) -> Value {
        Value::Object(Arc::clone(&self.map))
    }
}
