//! Per-language route table.
//!
//! # Design Decisions
//! - Language order is explicit (a `Vec`), never the iteration order of a map
//! - Two accepted config shapes: an ordered list of `{ language, pages }`
//!   entries, or a table keyed by language code (ordered afterwards by
//!   [`RouteTable::order_by`])
//! - A view descriptor is either a bare view id or `{ view, title }`

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

/// What a single URL path maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDescriptor {
    /// View identifier, used to build the fragment name.
    pub view: String,
    /// Optional display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ViewDescriptor {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    View(String),
    Full { view: String, title: Option<String> },
}

impl<'de> Deserialize<'de> for ViewDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawDescriptor::deserialize(deserializer)? {
            RawDescriptor::View(view) => ViewDescriptor { view, title: None },
            RawDescriptor::Full { view, title } => ViewDescriptor { view, title },
        })
    }
}

/// The routes published under one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageRoutes {
    /// Language code; this is the language a match implies.
    pub language: String,
    /// URL path (base already stripped) → view.
    #[serde(default)]
    pub pages: HashMap<String, ViewDescriptor>,
}

/// Ordered mapping of language → (path → view).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    languages: Vec<LanguageRoutes>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRouteTable {
    Ordered(Vec<LanguageRoutes>),
    Keyed(BTreeMap<String, HashMap<String, ViewDescriptor>>),
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let languages = match RawRouteTable::deserialize(deserializer)? {
            RawRouteTable::Ordered(languages) => languages,
            RawRouteTable::Keyed(map) => map
                .into_iter()
                .map(|(language, pages)| LanguageRoutes { language, pages })
                .collect(),
        };
        Ok(Self { languages })
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a language's routes; it will be scanned after those already present.
    pub fn push(&mut self, language: impl Into<String>, pages: HashMap<String, ViewDescriptor>) {
        self.languages.push(LanguageRoutes {
            language: language.into(),
            pages,
        });
    }

    /// Builder-style [`RouteTable::push`] for a list of `(path, descriptor)` pairs.
    pub fn with_language<I, P>(mut self, language: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = (P, ViewDescriptor)>,
        P: Into<String>,
    {
        let pages = pages.into_iter().map(|(p, d)| (p.into(), d)).collect();
        self.push(language, pages);
        self
    }

    /// Move the languages named in `preferred` to the front, in that order.
    ///
    /// Languages not named keep their relative order after the preferred ones.
    pub fn order_by(&mut self, preferred: &[String]) {
        self.languages.sort_by_key(|routes| {
            preferred
                .iter()
                .position(|code| *code == routes.language)
                .unwrap_or(usize::MAX)
        });
    }

    /// First language (in table order) whose routes contain `path`.
    pub fn lookup(&self, path: &str) -> Option<(&str, &ViewDescriptor)> {
        self.languages.iter().find_map(|routes| {
            routes
                .pages
                .get(path)
                .map(|descriptor| (routes.language.as_str(), descriptor))
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageRoutes> {
        self.languages.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_from_bare_string() {
        let d: ViewDescriptor = serde_json::from_value(json!("about_page")).unwrap();
        assert_eq!(d, ViewDescriptor::new("about_page"));
    }

    #[test]
    fn test_descriptor_with_title() {
        let d: ViewDescriptor =
            serde_json::from_value(json!({"view": "about_page", "title": "About"})).unwrap();
        assert_eq!(d.view, "about_page");
        assert_eq!(d.title.as_deref(), Some("About"));
    }

    #[test]
    fn test_ordered_form_keeps_order() {
        let table: RouteTable = serde_json::from_value(json!([
            {"language": "fr", "pages": {"contact": "contact_fr"}},
            {"language": "en", "pages": {"contact": "contact_en"}},
        ]))
        .unwrap();

        let (lang, d) = table.lookup("contact").unwrap();
        assert_eq!(lang, "fr");
        assert_eq!(d.view, "contact_fr");
    }

    #[test]
    fn test_keyed_form_then_order_by() {
        let mut table: RouteTable = serde_json::from_value(json!({
            "en": {"contact": "contact_en"},
            "fr": {"contact": "contact_fr"},
        }))
        .unwrap();

        // keyed form is ordered by code until told otherwise
        assert_eq!(table.lookup("contact").unwrap().0, "en");

        table.order_by(&["fr".to_string(), "en".to_string()]);
        assert_eq!(table.lookup("contact").unwrap().0, "fr");
    }

    #[test]
    fn test_order_by_keeps_unlisted_after() {
        let mut table = RouteTable::new()
            .with_language("de", [("x", ViewDescriptor::new("de_x"))])
            .with_language("en", [("x", ViewDescriptor::new("en_x"))])
            .with_language("fr", [("x", ViewDescriptor::new("fr_x"))]);

        table.order_by(&["fr".to_string()]);
        let order: Vec<_> = table.languages().map(|l| l.language.as_str()).collect();
        assert_eq!(order, vec!["fr", "de", "en"]);
    }

    #[test]
    fn test_lookup_miss() {
        let table = RouteTable::new().with_language("en", [("about", ViewDescriptor::new("about"))]);
        assert!(table.lookup("missing").is_none());
    }
}
