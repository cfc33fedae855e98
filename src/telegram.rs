//! Delivery of finished questionnaires to the configured Telegram chat.
//!
//! Each call is a single attempt with its own timeout. Callers may simply
//! call again after a failure; nothing is retried here.

use crate::config::Config;
use crate::i18n::Language;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Media types delivered with `sendPhoto` for an inline preview.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Telegram Bot Token or Chat ID not configured.")]
    Configuration,

    #[error("Request timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    /// Attachment refused by the API: its description, or `HTTP <status>`.
    #[error("{0}")]
    AttachmentRejected(String),
}

impl DeliveryError {
    /// User-facing message in `lang`.
    pub fn localized(&self, lang: Language) -> String {
        let t = lang.strings();
        match self {
            DeliveryError::Configuration => t.delivery_not_configured.to_string(),
            DeliveryError::Timeout(_) => t.delivery_timeout.to_string(),
            DeliveryError::Transport(message) if message.is_empty() => {
                t.delivery_network_error.to_string()
            }
            DeliveryError::Transport(message) => message.clone(),
            DeliveryError::Api(detail) => format!("{}: {}", t.delivery_api_error, detail),
            DeliveryError::AttachmentRejected(detail) => detail.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// A file to deliver alongside the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file, guessing its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .context(format!("Failed to read attachment {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Ok(Self::new(file_name, media_type_for(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        IMAGE_TYPES.contains(&self.media_type.as_str())
    }
}

/// Best-effort media type from a file extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn credentials(config: &Config) -> Result<(&str, &str), DeliveryError> {
    if !config.has_telegram_credentials() {
        return Err(DeliveryError::Configuration);
    }
    Ok((config.telegram_bot_token.as_str(), config.telegram_chat_id.as_str()))
}

fn method_url(config: &Config, token: &str, method: &str) -> String {
    format!(
        "{}/bot{}/{}",
        config.telegram_api_url.trim_end_matches('/'),
        token,
        method
    )
}

/// Run a request under a deadline, mapping transport failures.
async fn with_deadline<F>(limit: Duration, request: F) -> Result<reqwest::Response, DeliveryError>
where
    F: Future<Output = reqwest::Result<reqwest::Response>>,
{
    match tokio::time::timeout(limit, request).await {
        Err(_) => Err(DeliveryError::Timeout(limit)),
        Ok(Err(e)) if e.is_timeout() => Err(DeliveryError::Timeout(limit)),
        Ok(Err(e)) => Err(DeliveryError::Transport(e.to_string())),
        Ok(Ok(response)) => Ok(response),
    }
}

/// Interpret a Bot API response. `fallback` renders the status when the
/// API gave no description.
async fn check_response(
    response: reqwest::Response,
    fallback: impl FnOnce(StatusCode) -> String,
) -> Result<(), DeliveryError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DeliveryError::Transport(e.to_string()))?;

    match serde_json::from_str::<ApiResponse>(&body) {
        Ok(api) if status.is_success() && api.ok => Ok(()),
        Ok(api) => Err(DeliveryError::Api(
            api.description.unwrap_or_else(|| fallback(status)),
        )),
        Err(_) if !status.is_success() => Err(DeliveryError::Api(fallback(status))),
        Err(e) => Err(DeliveryError::Transport(format!(
            "Failed to parse Telegram response: {}",
            e
        ))),
    }
}

/// Send the report text to the configured chat.
pub async fn send_text(config: &Config, message: &str) -> Result<(), DeliveryError> {
    let (token, chat_id) = credentials(config)?;
    let client = reqwest::Client::new();

    let request = SendMessageRequest {
        chat_id,
        text: message,
        parse_mode: "Markdown",
    };

    let result = async {
        let response = with_deadline(
            config.text_timeout,
            client
                .post(method_url(config, token, "sendMessage"))
                .json(&request)
                .send(),
        )
        .await?;
        check_response(response, |status| status.as_u16().to_string()).await
    }
    .await;

    match &result {
        Ok(()) => info!("Delivered questionnaire message ({} chars)", message.chars().count()),
        Err(e) => warn!("Failed to deliver questionnaire message: {}", e),
    }
    result
}

/// Send a file to the configured chat; images go out as photos.
pub async fn send_attachment(
    config: &Config,
    attachment: &Attachment,
    caption: Option<&str>,
) -> Result<(), DeliveryError> {
    let (token, chat_id) = credentials(config)?;
    let client = reqwest::Client::new();

    let (method, field) = if attachment.is_image() {
        ("sendPhoto", "photo")
    } else {
        ("sendDocument", "document")
    };

    let part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
    let part = match part.mime_str(&attachment.media_type) {
        Ok(part) => part,
        Err(_) => Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone()),
    };

    let mut form = Form::new()
        .text("chat_id", chat_id.to_string())
        .part(field, part);
    if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
        form = form.text("caption", caption.to_string());
    }

    let result = async {
        let response = with_deadline(
            config.attachment_timeout,
            client
                .post(method_url(config, token, method))
                .multipart(form)
                .send(),
        )
        .await?;
        check_response(response, |status| format!("HTTP {}", status.as_u16()))
            .await
            .map_err(|e| match e {
                DeliveryError::Api(detail) => DeliveryError::AttachmentRejected(detail),
                other => other,
            })
    }
    .await;

    match &result {
        Ok(()) => info!(
            "Delivered attachment {} via {} ({} bytes)",
            attachment.file_name,
            method,
            attachment.bytes.len()
        ),
        Err(e) => warn!("Failed to deliver attachment {}: {}", attachment.file_name, e),
    }
    result
}
