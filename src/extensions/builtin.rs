//! Extensions shipped with the crate.
//!
//! - `clock`: current date (`{{ clock.year }}`, `{{ clock.date }}`)
//! - `data`: the contents of `data.toml`, exposed verbatim

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local};
use serde_json::{json, Value};

use crate::extensions::registry::{Extension, ExtensionContext, ExtensionError, ExtensionRegistry};
use crate::render::Scope;

pub fn register_builtins(registry: &mut ExtensionRegistry) {
    registry.register("clock", Clock::from_context);
    registry.register("data", StaticData::from_context);
}

/// Current local date.
#[derive(Debug, Clone)]
pub struct Clock {
    date_format: String,
}

impl Clock {
    const DEFAULT_FORMAT: &'static str = "%Y-%m-%d";

    fn from_context(ctx: &mut ExtensionContext<'_>) -> Result<Box<dyn Extension>, ExtensionError> {
        let date_format = match ctx.settings().get("date_format") {
            None => Self::DEFAULT_FORMAT.to_string(),
            Some(Value::String(format)) => format.clone(),
            Some(_) => return Err(ctx.invalid("date_format must be a string")),
        };
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ctx.invalid(format!("'{date_format}' is not a valid date format")));
        }
        Ok(Box::new(Clock { date_format }))
    }
}

impl Extension for Clock {
    fn scope_value(&self, _scope: &Scope) -> Value {
        let now = Local::now();
        json!({
            "year": now.year(),
            "date": now.format(&self.date_format).to_string(),
            "timestamp": now.to_rfc3339(),
        })
    }
}

/// Static values loaded from the extension's settings file.
#[derive(Debug, Clone)]
pub struct StaticData {
    values: Value,
}

impl StaticData {
    fn from_context(ctx: &mut ExtensionContext<'_>) -> Result<Box<dyn Extension>, ExtensionError> {
        Ok(Box::new(StaticData {
            values: ctx.settings().clone(),
        }))
    }
}

impl Extension for StaticData {
    fn scope_value(&self, _scope: &Scope) -> Value {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;

    #[test]
    fn test_builtins_registered() {
        let registry = ExtensionRegistry::with_builtins();
        assert!(registry.contains("clock"));
        assert!(registry.contains("data"));
    }

    #[test]
    fn test_clock_and_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.toml"), "company = \"ACME\"\n[social]\nmastodon = \"@acme\"").unwrap();
        std::fs::write(dir.path().join("clock.toml"), "date_format = \"%Y\"").unwrap();

        let mut config = ConfigStore::new();
        let loaded = ExtensionRegistry::with_builtins()
            .load(&["clock".into(), "data".into()], dir.path(), &mut config)
            .unwrap();

        let mut scope = Scope::new();
        loaded.populate(&mut scope);

        let year = scope.lookup("clock.year").and_then(Value::as_i64).unwrap();
        assert!(year >= 2024);
        assert_eq!(scope.display("clock.date"), Some(year.to_string()));
        assert_eq!(scope.display("data.company").as_deref(), Some("ACME"));
        assert_eq!(scope.display("data.social.mastodon").as_deref(), Some("@acme"));
    }

    #[test]
    fn test_clock_rejects_bad_format_type() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigStore::new();
        for settings in ["date_format = 5", "date_format = \"%Q%\""] {
            std::fs::write(dir.path().join("clock.toml"), settings).unwrap();
            let err = ExtensionRegistry::with_builtins()
                .load(&["clock".into()], dir.path(), &mut config)
                .unwrap_err();
            assert!(matches!(err, ExtensionError::Settings { .. }));
        }
    }
}
