//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::SiteSettings;
use crate::config::store::ConfigStore;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration loading and option access.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration source did not yield a mapping.
    #[error("configuration source must yield a mapping, got {0}")]
    InvalidSource(String),

    /// A required option was never set and has no default.
    #[error("missing configuration option '{0}'")]
    MissingOption(String),

    /// An option is present but has the wrong shape.
    #[error("invalid configuration option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a configuration file into a JSON value.
///
/// `.json` files are parsed as JSON, everything else as TOML.
pub fn read_source(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        let table: toml::Table = toml::from_str(&content)?;
        Ok(serde_json::to_value(table)?)
    }
}

/// Load a configuration file and merge it over the built-in defaults.
pub fn load_config(path: &Path) -> Result<ConfigStore, ConfigError> {
    let source = read_source(path)?;
    let mut store = ConfigStore::new();
    store.merge_value(source)?;

    tracing::debug!(path = %path.display(), "Configuration file merged over defaults");
    Ok(store)
}

/// Load a configuration file and check it; returns the store and its typed view.
pub fn load_validated_config(path: &Path) -> Result<(ConfigStore, SiteSettings), ConfigError> {
    let store = load_config(path)?;
    let settings = SiteSettings::from_store(&store)?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;
    Ok((store, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            r#"
page_default = "index"
languages_available = ["en", "fr"]

[server]
bind_address = "127.0.0.1:9000"
"#,
        );

        let store = load_config(file.path()).unwrap();
        assert_eq!(store.get("page_default").unwrap(), "index");
        assert_eq!(store.get("languages_available").unwrap()[1], "fr");
        assert_eq!(store.get("server").unwrap()["bind_address"], "127.0.0.1:9000");
        assert_eq!(store.get("page_base").unwrap(), "/");
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"page_default": "start"}"#);
        let store = load_config(file.path()).unwrap();
        assert_eq!(store.get("page_default").unwrap(), "start");
    }

    #[test]
    fn test_json_source_must_be_mapping() {
        let file = write_temp(".json", r#"["home"]"#);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSource(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validated_load_rejects_bad_settings() {
        let file = write_temp(
            ".toml",
            r#"
languages_available = ["en"]
language_default = "fr"
"#,
        );
        match load_validated_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors[0].key, "language_default"),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_temp(".toml", "page_default = ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
