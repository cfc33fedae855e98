//! Language registry: Single source of truth for all supported languages.
//!
//! Uses a singleton pattern with `OnceLock` so the registry is built once
//! and shared read-only afterwards.

use std::sync::OnceLock;

use super::strings::{ENGLISH_STRINGS, RUSSIAN_STRINGS};
use super::LanguageStrings;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "ru", "en")
    pub code: &'static str,

    /// Whether this is the default language of the site (only one should be true)
    pub is_canonical: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,

    /// Localized UI strings for this language
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// The canonical language is the site default and the fallback for any
    /// catalog label that lacks a translation.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical
    /// language (this indicates a programming error in `default_languages`).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// Default language configurations: Russian (canonical) and English.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "ru",
            is_canonical: true,
            enabled: true,
            strings: &RUSSIAN_STRINGS,
        },
        LanguageConfig {
            code: "en",
            is_canonical: false,
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
    ]
}
