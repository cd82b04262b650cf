//! Variable scope shared by all fragments of one request.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::ConfigStore;

/// Named values visible to fragments.
///
/// Seeded from the option store, then extended with request-derived values.
/// Fragments get `&mut Scope`, so a value set by one fragment is visible to
/// every fragment rendered after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scope {
    vars: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope holding a copy of every configured option.
    pub fn from_config(config: &ConfigStore) -> Self {
        let vars = config
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self { vars }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Look up a dotted path: `clock.year` reads key `year` of value `clock`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.vars.get(segments.next()?)?;
        for segment in segments {
            value = match value {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(value)
    }

    /// Render a scalar value as text; `None` for arrays, objects and unknown paths.
    pub fn display(&self, path: &str) -> Option<String> {
        match self.lookup(path)? {
            Value::Null => Some(String::new()),
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
