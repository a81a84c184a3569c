//! Form field descriptors.
//!
//! The core never interprets fields; it only has to hand them back exactly as
//! it received them. A field is kept as the raw JSON the backend sent, so
//! explicit `null`s, unfamiliar keys and unexpected value types all survive a
//! save/load cycle. The accessors below read the backend's usual keys and
//! return `None` when a key is missing or has another type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fillable field detected in the uploaded PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormField(Value);

impl FormField {
    /// Builds a field with the backend's three identifying keys.
    pub fn new(field_id: impl Into<String>, field_type: impl Into<String>, page: u32) -> Self {
        let mut map = Map::new();
        map.insert("field_id".to_string(), Value::from(field_id.into()));
        map.insert("field_type".to_string(), Value::from(field_type.into()));
        map.insert("page".to_string(), Value::from(page));
        Self(Value::Object(map))
    }

    /// Wraps whatever JSON the backend produced.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Sets a key, turning a non-object field into an object first.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.into(), value.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn field_id(&self) -> Option<&str> {
        self.get("field_id").and_then(Value::as_str)
    }

    /// `text`, `checkbox`, `dropdown`, `radio`, ...
    pub fn field_type(&self) -> Option<&str> {
        self.get("field_type").and_then(Value::as_str)
    }

    pub fn page(&self) -> Option<u64> {
        self.get("page").and_then(Value::as_u64)
    }

    pub fn label_context(&self) -> Option<&str> {
        self.get("label_context").and_then(Value::as_str)
    }

    /// The raw value; `null` and a missing key both read as `None`.
    pub fn current_value(&self) -> Option<&Value> {
        self.get("current_value").filter(|v| !v.is_null())
    }

    pub fn options(&self) -> Option<Vec<&str>> {
        self.get("options")
            .and_then(Value::as_array)
            .map(|opts| opts.iter().filter_map(Value::as_str).collect())
    }
}

impl From<Value> for FormField {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
