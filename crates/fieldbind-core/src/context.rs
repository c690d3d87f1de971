//! Locale and value context handed to converters and validators

use crate::field::FieldId;
use serde::{Deserialize, Serialize};
use std::fmt;

const FALLBACK_LOCALE: &str = "en-US";

/// A BCP 47 style language tag such as `en-US` or `de-DE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parse a tag, accepting POSIX forms like `de_DE.UTF-8@euro`
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        let tag = tag.split(['.', '@']).next().unwrap_or(tag);
        let tag = tag.replace('_', "-");
        if tag.is_empty() {
            return Self(FALLBACK_LOCALE.to_string());
        }
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased primary language subtag, e.g. `de` for `de-DE`
    pub fn language(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, else `en-US`
    pub fn process_default() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
            .map(Locale::new)
            .unwrap_or_default()
    }

    /// Decimal separator used when parsing and formatting numbers
    pub fn decimal_separator(&self) -> char {
        match self.language().as_str() {
            "de" | "fr" | "es" | "it" | "pt" | "nl" | "ru" | "pl" | "sv" | "fi" | "da"
            | "nb" | "cs" | "tr" => ',',
            _ => '.',
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(FALLBACK_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

/// Source of the locale used when a field does not report one
pub trait LocaleResolver {
    fn current_locale(&self) -> Option<Locale>;
}

/// Resolves to the process default locale
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLocale;

impl LocaleResolver for ProcessLocale {
    fn current_locale(&self) -> Option<Locale> {
        Some(Locale::process_default())
    }
}

/// Always resolves to the same locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocale(pub Locale);

impl LocaleResolver for FixedLocale {
    fn current_locale(&self) -> Option<Locale> {
        Some(self.0.clone())
    }
}

/// Context passed to every conversion and validation call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueContext {
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldId>,
}

impl ValueContext {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            field: None,
        }
    }

    pub fn with_field(mut self, field: FieldId) -> Self {
        self.field = Some(field);
        self
    }

    /// Field locale first, then the resolver, then the process default
    pub fn resolve(
        field_locale: Option<Locale>,
        resolver: &dyn LocaleResolver,
        field: FieldId,
    ) -> Self {
        let locale = field_locale
            .or_else(|| resolver.current_locale())
            .unwrap_or_else(Locale::process_default);
        Self::new(locale).with_field(field)
    }
}
