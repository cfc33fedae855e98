//! Question catalogs: the static sections and questions of each
//! questionnaire type, loaded from JSON.

use crate::form::QuestionnaireType;
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate question id '{0}' in catalog")]
    DuplicateQuestion(String),
}

/// Text keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Text in `lang`, falling back to the canonical language, then to any
    /// translation at all.
    pub fn get(&self, lang: Language) -> &str {
        self.0
            .get(lang.code())
            .or_else(|| self.0.get(Language::canonical().code()))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Number,
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: LocalizedText,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::Radio | QuestionKind::Checkbox)
    }

    /// The option with this value, if the question offers one.
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.option(value).is_some()
    }

    /// Display label of an answer value; unknown values pass through.
    pub fn option_label<'a>(&'a self, value: &'a str, lang: Language) -> &'a str {
        self.option(value).map(|o| o.label.get(lang)).unwrap_or(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: LocalizedText,
    pub questions: Vec<Question>,
}

/// All sections of one questionnaire type, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sections: Vec<Section>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load `<dir>/<type>.json`.
    pub fn load(dir: &Path, kind: QuestionnaireType) -> Result<Self, CatalogError> {
        let path = dir.join(format!("{}.json", kind.as_str()));
        let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let catalog = Self::from_json(&content).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;
        catalog.check_unique_ids()?;

        debug!(
            "Loaded catalog {} ({} sections, {} questions)",
            path.display(),
            catalog.sections.len(),
            catalog.questions().count()
        );
        Ok(catalog)
    }

    /// Every question across all sections, in order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    pub fn check_unique_ids(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for question in self.questions() {
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
        }
        Ok(())
    }
}
