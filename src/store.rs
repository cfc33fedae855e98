//! Best-effort persistence of in-progress questionnaires.
//!
//! One snapshot per (questionnaire type, language). Storage failures are
//! logged and swallowed here: a broken cache must never block the form.

use crate::form::{AdditionalText, Answer, AnswerSet, ContactInfo, QuestionnaireType, SourceInfo};
use crate::i18n::Language;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Snapshots older than this are treated as absent.
pub const SNAPSHOT_MAX_AGE_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key-value backend for snapshots.
pub trait SnapshotStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process storage, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl SnapshotStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Persisted in-progress state of one questionnaire attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub form_data: AnswerSet,
    pub additional_data: AdditionalText,
    pub contact_data: ContactInfo,
    pub source_data: SourceInfo,
    /// Capture instant, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Stored shape before contact normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    #[serde(default)]
    form_data: BTreeMap<String, Value>,
    #[serde(default)]
    additional_data: BTreeMap<String, Value>,
    #[serde(default)]
    contact_data: Option<Value>,
    #[serde(default)]
    source_data: Option<SourceInfo>,
    timestamp: i64,
}

pub fn storage_key(kind: QuestionnaireType, lang: Language) -> String {
    format!("health_questionnaire_{}_{}", kind.as_str(), lang.code())
}

/// Bring any stored contact shape to `{telegram, instagram}`.
///
/// The older layout was `{method, username}`; anything unrecognised
/// becomes empty handles.
pub fn normalize_contact(raw: Option<&Value>) -> ContactInfo {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return ContactInfo::default();
    };
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    if obj.contains_key("method") && obj.contains_key("username") {
        let method = obj.get("method").and_then(Value::as_str);
        let username = text("username");
        return ContactInfo {
            telegram: if method == Some("telegram") { username.clone() } else { String::new() },
            instagram: if method == Some("instagram") { username } else { String::new() },
        };
    }

    if !obj.contains_key("telegram") {
        return ContactInfo::default();
    }

    ContactInfo {
        telegram: text("telegram"),
        instagram: text("instagram"),
    }
}

/// Render a stored scalar as answer text. Null and nested values have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode stored answers leniently: numbers and booleans become text,
/// values with no text form are dropped instead of the whole snapshot.
fn answers_from_values(raw: BTreeMap<String, Value>) -> AnswerSet {
    raw.into_iter()
        .filter_map(|(id, value)| {
            let answer = match &value {
                Value::Array(items) => {
                    Answer::Multiple(items.iter().filter_map(scalar_text).collect())
                }
                other => Answer::Single(scalar_text(other)?),
            };
            Some((id, answer))
        })
        .collect()
}

fn texts_from_values(raw: BTreeMap<String, Value>) -> AdditionalText {
    raw.into_iter()
        .filter_map(|(key, value)| scalar_text(&value).map(|text| (key, text)))
        .collect()
}

/// Sole owner of the persisted questionnaire snapshots.
pub struct FormStore<S: SnapshotStorage> {
    storage: S,
}

impl<S: SnapshotStorage> FormStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save(
        &self,
        kind: QuestionnaireType,
        lang: Language,
        answers: &AnswerSet,
        additional: &AdditionalText,
        contact: &ContactInfo,
        source: Option<&SourceInfo>,
    ) {
        let snapshot = Snapshot {
            form_data: answers.clone(),
            additional_data: additional.clone(),
            contact_data: contact.clone(),
            source_data: source.cloned().unwrap_or_default(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let key = storage_key(kind, lang);

        let result = serde_json::to_string(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.set_item(&key, &json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => debug!("Saved form data for {}", key),
            Err(e) => warn!("Error saving form data for {}: {}", key, e),
        }
    }

    pub fn load(&self, kind: QuestionnaireType, lang: Language) -> Option<Snapshot> {
        self.load_at(kind, lang, Utc::now())
    }

    /// Like `load`, judging freshness against `now`.
    pub fn load_at(
        &self,
        kind: QuestionnaireType,
        lang: Language,
        now: DateTime<Utc>,
    ) -> Option<Snapshot> {
        let key = storage_key(kind, lang);

        let raw = match self.storage.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Error loading form data for {}: {}", key, e);
                return None;
            }
        };

        let stored: StoredSnapshot = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Error loading form data for {}: {}", key, e);
                return None;
            }
        };

        let Some(age_ms) = now.timestamp_millis().checked_sub(stored.timestamp) else {
            warn!("Ignoring form data for {}: timestamp {} out of range", key, stored.timestamp);
            return None;
        };
        if age_ms >= Duration::hours(SNAPSHOT_MAX_AGE_HOURS).num_milliseconds() {
            debug!("Ignoring stale form data for {} ({} ms old)", key, age_ms);
            return None;
        }

        Some(Snapshot {
            contact_data: normalize_contact(stored.contact_data.as_ref()),
            form_data: answers_from_values(stored.form_data),
            additional_data: texts_from_values(stored.additional_data),
            source_data: stored.source_data.unwrap_or_default(),
            timestamp: stored.timestamp,
        })
    }

    pub fn clear(&self, kind: QuestionnaireType, lang: Language) {
        let key = storage_key(kind, lang);
        if let Err(e) = self.storage.remove_item(&key) {
            warn!("Error clearing form data for {}: {}", key, e);
        }
    }
}
