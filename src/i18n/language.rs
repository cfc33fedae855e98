//! Language type: validated language representation.

use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated language.
///
/// Only supported, enabled languages can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "ru", "en")
    code: &'static str,
}

impl Language {
    pub const RUSSIAN: Language = Language { code: "ru" };

    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The site's default language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This cannot
    /// happen for a Language built via `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Localized UI strings for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        self.config().strings
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_russian_constant() {
        let russian = Language::RUSSIAN;
        assert_eq!(russian.code(), "ru");
        assert_eq!(russian, Language::canonical());
    }

    #[test]
    fn test_english_constant() {
        let english = Language::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_ne!(english, Language::canonical());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_valid() {
        assert_eq!(Language::from_code("ru").unwrap(), Language::RUSSIAN);
        assert_eq!(Language::from_code("en").unwrap(), Language::ENGLISH);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_parse_via_from_str() {
        let lang: Language = "en".parse().unwrap();
        assert_eq!(lang, Language::ENGLISH);
    }

    // ==================== Default / Display Tests ====================

    #[test]
    fn test_default_is_canonical() {
        assert_eq!(Language::default(), Language::RUSSIAN);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::ENGLISH.to_string(), "en");
    }

    // ==================== Serde Tests ====================

    #[test]
    fn test_serde_as_code() {
        let json = serde_json::to_string(&Language::RUSSIAN).unwrap();
        assert_eq!(json, "\"ru\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::ENGLISH);
    }

    #[test]
    fn test_deserialize_unknown_code_fails() {
        let result: std::result::Result<Language, _> = serde_json::from_str("\"zz\"");
        assert!(result.is_err());
    }

    // ==================== Strings Access Tests ====================

    #[test]
    fn test_strings_follow_language() {
        assert_eq!(Language::ENGLISH.strings().required, "This field is required");
        assert_eq!(Language::RUSSIAN.strings().required, "Обязательное поле");
    }
}
