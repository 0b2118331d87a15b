//! Keyword arguments handed to a handler, and the parse result they come from.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parameter name -> value map passed to a handler.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Kwargs(Map<String, Value>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed access. Fails when the name is absent or the value does not
    /// deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let raw = self
            .0
            .get(name)
            .with_context(|| format!("missing keyword argument `{name}`"))?;
        serde_json::from_value(raw.clone())
            .with_context(|| format!("keyword argument `{name}` has unexpected type"))
    }

    /// Raw value access.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Kwargs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Outcome of parsing argv: the selected command (if any) and every value,
/// top-level arguments included.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Namespace {
    pub command: Option<String>,
    pub values: Kwargs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Kwargs {
        let mut kw = Kwargs::new();
        kw.insert("a", json!(1));
        kw.insert("tags", json!(["x", "y"]));
        kw.insert("name", json!("bob"));
        kw
    }

    #[test]
    fn typed_get() {
        let kw = sample();
        assert_eq!(kw.get::<i64>("a").unwrap(), 1);
        assert_eq!(kw.get::<Vec<String>>("tags").unwrap(), ["x", "y"]);
        assert_eq!(kw.get::<String>("name").unwrap(), "bob");
    }

    #[test]
    fn missing_and_mistyped() {
        let kw = sample();
        let err = kw.get::<i64>("nope").unwrap_err();
        assert!(err.to_string().contains("missing keyword argument"));
        let err = kw.get::<i64>("name").unwrap_err();
        assert!(err.to_string().contains("unexpected type"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let kw = sample();
        assert_eq!(
            serde_json::to_value(&kw).unwrap(),
            json!({"a": 1, "name": "bob", "tags": ["x", "y"]})
        );
    }
}
