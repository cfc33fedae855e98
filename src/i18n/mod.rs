//! Internationalization (i18n) module for multi-language support.
//!
//! All language-related logic and localized strings live here. Question
//! labels come from the catalog itself; this module only owns the chrome
//! around them (error messages, report headings, delivery errors).
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Validated `Language` type backed by the registry
//! - `strings`: Localized user-facing strings, one table per language
//!
//! # Example
//!
//! ```rust,ignore
//! use health_questionnaire::i18n::Language;
//!
//! let english = Language::from_code("en")?;
//! let required = english.strings().required;
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
