//! Syntax checks for Telegram and Instagram usernames.

use crate::form::clean_handle;
use crate::i18n::Language;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const TELEGRAM_MIN_LEN: usize = 5;
const TELEGRAM_MAX_LEN: usize = 32;
const INSTAGRAM_MAX_LEN: usize = 30;

static TELEGRAM_CHARS: OnceLock<Regex> = OnceLock::new();
static INSTAGRAM_CHARS: OnceLock<Regex> = OnceLock::new();
static INSTAGRAM_DOTS: OnceLock<Regex> = OnceLock::new();

fn telegram_chars() -> &'static Regex {
    TELEGRAM_CHARS.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid regex"))
}

fn instagram_chars() -> &'static Regex {
    INSTAGRAM_CHARS.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._]+$").expect("valid regex"))
}

fn instagram_dots() -> &'static Regex {
    INSTAGRAM_DOTS.get_or_init(|| Regex::new(r"^\.|\.\.|\.$").expect("valid regex"))
}

/// Why a handle was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactError {
    Empty,
    TelegramTooShort,
    TelegramTooLong,
    TelegramInvalidChars,
    InstagramTooLong,
    InstagramInvalidChars,
    InstagramDots,
}

impl ContactError {
    /// Stable error code string.
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::Empty => "empty",
            ContactError::TelegramTooShort => "telegram_too_short",
            ContactError::TelegramTooLong => "telegram_too_long",
            ContactError::TelegramInvalidChars => "telegram_invalid_chars",
            ContactError::InstagramTooLong => "instagram_too_long",
            ContactError::InstagramInvalidChars => "instagram_invalid_chars",
            ContactError::InstagramDots => "instagram_dots",
        }
    }

    /// Translated message, or `None` when the language has none for this
    /// code (`empty` never has one).
    pub fn message(&self, lang: Language) -> Option<&'static str> {
        let t = lang.strings();
        let message = match self {
            ContactError::Empty => return None,
            ContactError::TelegramTooShort => t.telegram_too_short,
            ContactError::TelegramTooLong => t.telegram_too_long,
            ContactError::TelegramInvalidChars => t.telegram_invalid_chars,
            ContactError::InstagramTooLong => t.instagram_too_long,
            ContactError::InstagramInvalidChars => t.instagram_invalid_chars,
            ContactError::InstagramDots => t.instagram_dots,
        };
        Some(message).filter(|m| !m.is_empty())
    }
}

/// Outcome of a handle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ContactError>,
}

impl ContactValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(error: ContactError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}

pub fn validate_telegram_username(raw: &str) -> ContactValidation {
    let value = clean_handle(raw);
    let len = value.chars().count();

    if value.is_empty() {
        ContactValidation::fail(ContactError::Empty)
    } else if len < TELEGRAM_MIN_LEN {
        ContactValidation::fail(ContactError::TelegramTooShort)
    } else if len > TELEGRAM_MAX_LEN {
        ContactValidation::fail(ContactError::TelegramTooLong)
    } else if !telegram_chars().is_match(value) {
        ContactValidation::fail(ContactError::TelegramInvalidChars)
    } else {
        ContactValidation::ok()
    }
}

pub fn validate_instagram_username(raw: &str) -> ContactValidation {
    let value = clean_handle(raw);

    if value.is_empty() {
        ContactValidation::fail(ContactError::Empty)
    } else if value.chars().count() > INSTAGRAM_MAX_LEN {
        ContactValidation::fail(ContactError::InstagramTooLong)
    } else if !instagram_chars().is_match(value) {
        ContactValidation::fail(ContactError::InstagramInvalidChars)
    } else if instagram_dots().is_match(value) {
        ContactValidation::fail(ContactError::InstagramDots)
    } else {
        ContactValidation::ok()
    }
}
