//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (route languages are supported languages)
//! - Reject fragment names that would escape the pages directory
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteSettings → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::SiteSettings;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Check `settings` and collect every problem found.
pub fn validate_settings(settings: &SiteSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !settings.page_base.starts_with('/') || !settings.page_base.ends_with('/') {
        errors.push(ValidationError::new(
            "page_base",
            format!("'{}' must start and end with '/'", settings.page_base),
        ));
    }

    if let Some(forced) = &settings.protocol_force {
        if forced != "http" && forced != "https" {
            errors.push(ValidationError::new(
                "protocol_force",
                format!("'{forced}' must be \"http\" or \"https\""),
            ));
        }
    }

    if let Some(languages) = &settings.languages_available {
        if !languages.is_empty() && !languages.contains(&settings.language_default) {
            errors.push(ValidationError::new(
                "language_default",
                format!("'{}' is not in languages_available", settings.language_default),
            ));
        }
        for code in languages {
            if code.is_empty() || code.chars().any(|c| !c.is_ascii_alphanumeric() && c != '-') {
                errors.push(ValidationError::new(
                    "languages_available",
                    format!("'{code}' is not a language code"),
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    for routes in settings.pages_available.languages() {
        if !seen.insert(routes.language.as_str()) {
            errors.push(ValidationError::new(
                "pages_available",
                format!("language '{}' listed more than once", routes.language),
            ));
        }
        if let Some(languages) = &settings.languages_available {
            if !languages.contains(&routes.language) {
                errors.push(ValidationError::new(
                    "pages_available",
                    format!("language '{}' is not in languages_available", routes.language),
                ));
            }
        }
        for (path, descriptor) in &routes.pages {
            if let Some(problem) = fragment_name_problem(&descriptor.view) {
                errors.push(ValidationError::new(
                    "pages_available",
                    format!("view for '{}/{path}' {problem}", routes.language),
                ));
            }
        }
    }

    check_fragment_name(&mut errors, "page_default", &settings.page_default);
    for name in &settings.page_include_before {
        check_fragment_name(&mut errors, "page_include_before", name);
    }
    for name in &settings.page_include_after {
        check_fragment_name(&mut errors, "page_include_after", name);
    }

    if settings.language_query.is_empty() {
        errors.push(ValidationError::new("language_query", "must not be empty"));
    }
    if settings.language_cookie.is_empty()
        || settings
            .language_cookie
            .chars()
            .any(|c| c.is_ascii_whitespace() || "=;,".contains(c))
    {
        errors.push(ValidationError::new(
            "language_cookie",
            format!("'{}' is not a valid cookie name", settings.language_cookie),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_fragment_name(errors: &mut Vec<ValidationError>, key: &str, name: &str) {
    if let Some(problem) = fragment_name_problem(name) {
        errors.push(ValidationError::new(key, format!("'{name}' {problem}")));
    }
}

fn fragment_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("must not be empty")
    } else if name.contains("..") || name.contains('/') || name.contains('\\') {
        Some("must not contain path separators or '..'")
    } else {
        None
    }
}
