//! Extension registry and loader.
//!
//! # Responsibilities
//! - Map extension names to factories (explicit `register` calls)
//! - Instantiate the extensions named in the manifest, in manifest order
//! - Hand each extension its optional settings file and the option store
//!
//! # Design Decisions
//! - No directory scan or dynamic type lookup: the manifest names what runs
//! - The extensions directory only holds settings files (`<name>.toml`)
//! - Any failure is fatal at startup

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, ConfigStore};
use crate::render::Scope;

/// Errors raised while loading extensions.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("cannot load extensions from '{}': not a directory", .path.display())]
    Directory { path: PathBuf },

    #[error("unknown extension '{0}'")]
    Unknown(String),

    #[error("invalid settings for extension '{name}': {reason}")]
    Settings { name: String, reason: String },

    #[error("extension '{name}' failed to start: {reason}")]
    Init { name: String, reason: String },
}

/// A loaded extension.
pub trait Extension: Send + Sync {
    /// Value exposed to fragments under the extension's name.
    ///
    /// Called once per request, after the request-derived values are set.
    fn scope_value(&self, scope: &Scope) -> Value;
}

/// What a factory gets to build its extension.
pub struct ExtensionContext<'a> {
    name: &'a str,
    settings: Value,
    config: &'a mut ConfigStore,
}

impl<'a> ExtensionContext<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Contents of `<directory_extensions>/<name>.toml`, or an empty object.
    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Read a site option.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.config.get(key)
    }

    /// Set a site option; visible to fragments and later extensions.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.config.set(key, value);
    }

    /// Shorthand for a settings-shaped error.
    pub fn invalid(&self, reason: impl fmt::Display) -> ExtensionError {
        ExtensionError::Settings {
            name: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

type Factory =
    Arc<dyn Fn(&mut ExtensionContext<'_>) -> Result<Box<dyn Extension>, ExtensionError> + Send + Sync>;

/// Name → factory map.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    factories: HashMap<String, Factory>,
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ExtensionRegistry").field("factories", &names).finish()
    }
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in extensions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::extensions::builtin::register_builtins(&mut registry);
        registry
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&mut ExtensionContext<'_>) -> Result<Box<dyn Extension>, ExtensionError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiate every extension named in `manifest`.
    pub fn load(
        &self,
        manifest: &[String],
        directory: &Path,
        config: &mut ConfigStore,
    ) -> Result<Extensions, ExtensionError> {
        if manifest.is_empty() {
            return Ok(Extensions::default());
        }

        if !directory.is_dir() {
            return Err(ExtensionError::Directory {
                path: directory.to_path_buf(),
            });
        }

        let mut loaded = Vec::with_capacity(manifest.len());
        for name in manifest {
            let factory = self
                .factories
                .get(name)
                .ok_or_else(|| ExtensionError::Unknown(name.clone()))?;

            let settings = read_settings(name, directory)?;
            let mut ctx = ExtensionContext {
                name,
                settings,
                config: &mut *config,
            };
            let extension = factory(&mut ctx)?;

            tracing::info!(extension = %name, "Extension loaded");
            loaded.push((name.clone(), extension));
        }

        Ok(Extensions { loaded })
    }
}

fn read_settings(name: &str, directory: &Path) -> Result<Value, ExtensionError> {
    let path = directory.join(format!("{name}.toml"));
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let invalid = |reason: String| ExtensionError::Settings {
        name: name.to_string(),
        reason,
    };
    let content = std::fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    serde_json::to_value(table).map_err(|e| invalid(e.to_string()))
}

/// The extensions running for a site, in manifest order.
#[derive(Default)]
pub struct Extensions {
    loaded: Vec<(String, Box<dyn Extension>)>,
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Extensions {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Store each extension's value in `scope` under its name.
    pub fn populate(&self, scope: &mut Scope) {
        for (name, extension) in &self.loaded {
            let value = extension.scope_value(scope);
            scope.set(name.clone(), value);
        }
    }
}
