//! In-progress questionnaire data: answers, free-text elaborations, contacts
//! and referral source.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Audience category selecting which catalog applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireType {
    Infant,
    Child,
    Woman,
    Man,
}

impl QuestionnaireType {
    pub const ALL: [QuestionnaireType; 4] = [
        QuestionnaireType::Infant,
        QuestionnaireType::Child,
        QuestionnaireType::Woman,
        QuestionnaireType::Man,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionnaireType::Infant => "infant",
            QuestionnaireType::Child => "child",
            QuestionnaireType::Woman => "woman",
            QuestionnaireType::Man => "man",
        }
    }
}

impl fmt::Display for QuestionnaireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionnaireType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "infant" => Ok(QuestionnaireType::Infant),
            "child" => Ok(QuestionnaireType::Child),
            "woman" => Ok(QuestionnaireType::Woman),
            "man" => Ok(QuestionnaireType::Man),
            other => bail!(
                "Unknown questionnaire type: '{}' (expected infant, child, woman or man)",
                other
            ),
        }
    }
}

/// A single answer: free text / single choice, or a multi-select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// Whether the user actually answered: a non-blank string or a
    /// non-empty selection.
    pub fn is_given(&self) -> bool {
        match self {
            Answer::Single(value) => !value.trim().is_empty(),
            Answer::Multiple(values) => !values.is_empty(),
        }
    }

    /// Whether `value` is the single answer or one of the selected values.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Answer::Single(v) => v == value,
            Answer::Multiple(values) => values.iter().any(|v| v == value),
        }
    }

    /// The answer as a list of selected values.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Answer::Single(v) => vec![v.as_str()],
            Answer::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<Vec<&str>> for Answer {
    fn from(values: Vec<&str>) -> Self {
        Answer::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Question id -> answer, only for questions the user touched.
pub type AnswerSet = BTreeMap<String, Answer>;

/// Derived key (`<question-id>_additional`) -> free-text elaboration.
pub type AdditionalText = BTreeMap<String, String>;

/// Key of the elaboration field attached to a question.
pub fn additional_key(question_id: &str) -> String {
    format!("{}_additional", question_id)
}

/// Non-blank value of an additional-text entry, if any.
pub fn additional_value<'a>(additional: &'a AdditionalText, key: &str) -> Option<&'a str> {
    additional
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Contact handles; at least one must be present at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub instagram: String,
}

impl ContactInfo {
    pub fn has_telegram(&self) -> bool {
        !self.telegram.trim().is_empty()
    }

    pub fn has_instagram(&self) -> bool {
        !self.instagram.trim().is_empty()
    }
}

/// Referral channel; only rendered in the report, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub recommender: String,
}

/// Strip one leading `@` and surrounding whitespace from a handle.
pub fn clean_handle(raw: &str) -> &str {
    raw.strip_prefix('@').unwrap_or(raw).trim()
}
