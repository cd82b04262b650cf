//! Option store: name → value mapping with documented defaults.
//!
//! # Responsibilities
//! - Hold every site option as an untyped JSON value
//! - Seed the documented defaults at construction
//! - Merge external sources over the current contents (last merge wins)
//! - Typed reads that fail loudly on missing or malformed options
//!
//! # Design Decisions
//! - Keys are ordered (`serde_json::Map` is a BTreeMap), so iteration is stable
//! - No deletion: once a key exists it stays for the life of the store
//! - The store is built once at startup and then only read

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::config::loader::ConfigError;

/// Option map for a site.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    options: Map<String, Value>,
}

impl ConfigStore {
    /// Create a store holding only the built-in defaults.
    pub fn new() -> Self {
        let defaults = json!({
            "protocol_force": null,
            "pages_available": [],
            "page_default": "home",
            "page_default_title": null,
            "page_base": "/",
            "page_base_strip": "characters",
            "page_include_before": [],
            "page_include_after": [],
            "page_extension": ".html",
            "directory_pages": "./pages/",
            "directory_extensions": "./ext/",
            "languages_available": null,
            "language_default": "en",
            "language_query": "lang",
            "language_cookie": "lang",
            "extensions": [],
            "server": {},
            "observability": {},
        });

        let options = match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self { options }
    }

    /// Create a store from defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: Map<String, Value>) -> Self {
        let mut store = Self::new();
        store.merge(overrides);
        store
    }

    /// Merge a mapping over the current options, overwriting by key.
    pub fn merge(&mut self, overrides: Map<String, Value>) {
        for (key, value) in overrides {
            self.options.insert(key, value);
        }
    }

    /// Merge an arbitrary value, which must be a mapping.
    pub fn merge_value(&mut self, source: Value) -> Result<(), ConfigError> {
        match source {
            Value::Object(map) => {
                self.merge(map);
                Ok(())
            }
            other => Err(ConfigError::InvalidSource(json_kind(&other).to_string())),
        }
    }

    /// Set a single option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    /// Fetch a single option.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.options
            .get(key)
            .ok_or_else(|| ConfigError::MissingOption(key.to_string()))
    }

    /// Fetch an option and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.get(key)?;
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidOption {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Whether an option has been set (or defaulted).
    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Iterate over all options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.options.iter()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
