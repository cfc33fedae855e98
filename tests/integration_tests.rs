//! Integration tests for the questionnaire submission flow
//!
//! These tests drive the modules together the way a submit does:
//! snapshot store -> validation -> report -> Telegram delivery -> clear.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

use health_questionnaire::{
    catalog::Catalog,
    config::Config,
    form::{AdditionalText, Answer, AnswerSet, ContactInfo, QuestionnaireType, SourceInfo},
    i18n::Language,
    report::generate_report,
    store::{FileStorage, FormStore},
    telegram::{self, Attachment, DeliveryError},
    validation::{validate_form, ErrorCode, CONTACT_KEY},
};

// ==================== Test Helpers ====================

const WOMAN_CATALOG: &str = r#"{
    "sections": [
        {
            "id": "personal",
            "title": {"ru": "Личные данные", "en": "Personal data"},
            "questions": [
                {"id": "name", "type": "text", "label": {"ru": "Имя", "en": "Name"}, "required": true},
                {"id": "age", "type": "number", "label": {"ru": "Возраст", "en": "Age"}, "required": true}
            ]
        },
        {
            "id": "health",
            "title": {"ru": "Здоровье", "en": "Health"},
            "questions": [
                {
                    "id": "operations",
                    "type": "radio",
                    "label": {"ru": "Были ли операции?", "en": "Have you had surgery?"},
                    "required": true,
                    "options": [
                        {"value": "yes", "label": {"ru": "Да", "en": "Yes"}},
                        {"value": "no", "label": {"ru": "Нет", "en": "No"}}
                    ]
                },
                {
                    "id": "symptoms",
                    "type": "checkbox",
                    "label": {"ru": "Симптомы", "en": "Symptoms"},
                    "options": [
                        {"value": "fatigue", "label": {"ru": "Усталость", "en": "Fatigue"}},
                        {"value": "other", "label": {"ru": "Другое", "en": "Other"}}
                    ]
                }
            ]
        }
    ]
}"#;

fn create_catalog_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("woman.json"), WOMAN_CATALOG).expect("Failed to write catalog");
    dir
}

fn create_test_config(api_url: &str, temp_dir: &TempDir) -> Config {
    Config {
        telegram_bot_token: "test-telegram-token".to_string(),
        telegram_chat_id: "123456789".to_string(),
        telegram_api_url: api_url.to_string(),
        text_timeout: Duration::from_secs(5),
        attachment_timeout: Duration::from_secs(5),
        storage_dir: temp_dir.path().join("snapshots"),
        catalog_dir: temp_dir.path().to_path_buf(),
    }
}

fn complete_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.insert("name".into(), Answer::from("Anna"));
    answers.insert("age".into(), Answer::from("34"));
    answers.insert("operations".into(), Answer::from("yes"));
    answers.insert("symptoms".into(), Answer::from(vec!["fatigue", "other"]));
    answers
}

fn complete_additional() -> AdditionalText {
    let mut additional = AdditionalText::new();
    additional.insert("operations_additional".into(), "appendix removal".into());
    additional.insert("symptoms_additional".into(), "dizziness".into());
    additional
}

fn contact() -> ContactInfo {
    ContactInfo {
        telegram: "@john_doe12".into(),
        instagram: String::new(),
    }
}

fn telegram_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}}))
}

// ==================== Validation Flow Tests ====================

#[test]
fn test_incomplete_questionnaire_reports_every_problem() {
    let dir = create_catalog_dir();
    let catalog = Catalog::load(dir.path(), QuestionnaireType::Woman).unwrap();

    let mut answers = AnswerSet::new();
    answers.insert("operations".into(), Answer::from("yes"));
    answers.insert("age".into(), Answer::from("thirty"));
    answers.insert("symptoms".into(), Answer::from(vec!["other"]));

    let errors = validate_form(
        &catalog.sections,
        &answers,
        &ContactInfo::default(),
        Language::ENGLISH,
        &AdditionalText::new(),
    );

    assert_eq!(errors.get("name"), Some(ErrorCode::Required));
    assert_eq!(errors.get("age"), Some(ErrorCode::Required));
    assert_eq!(errors.get("operations_additional"), Some(ErrorCode::Required));
    assert_eq!(errors.get("symptoms_additional"), Some(ErrorCode::Required));
    assert_eq!(errors.get(CONTACT_KEY), Some(ErrorCode::AtLeastOneContactRequired));
    assert_eq!(errors.len(), 5);
}

#[test]
fn test_elaboration_clears_conditional_error() {
    let dir = create_catalog_dir();
    let catalog = Catalog::load(dir.path(), QuestionnaireType::Woman).unwrap();

    let mut additional = complete_additional();
    additional.remove("operations_additional");
    let errors = validate_form(
        &catalog.sections,
        &complete_answers(),
        &contact(),
        Language::ENGLISH,
        &additional,
    );
    assert_eq!(errors.get("operations_additional"), Some(ErrorCode::Required));

    let errors = validate_form(
        &catalog.sections,
        &complete_answers(),
        &contact(),
        Language::ENGLISH,
        &complete_additional(),
    );
    assert!(errors.is_empty());
}

// ==================== Submission Flow Tests ====================

#[tokio::test]
async fn test_full_submission_flow() {
    let dir = create_catalog_dir();
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/bottest-telegram-token/sendMessage"))
        .and(body_string_contains("1. **Have you had surgery?**"))
        .and(body_string_contains("appendix removal"))
        .and(body_string_contains("https://t.me/john_doe12"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    // The form autosaves while the user types
    let store = FormStore::new(FileStorage::new(&config.storage_dir));
    let source = SourceInfo {
        source: "recommendation".into(),
        recommender: "Maria".into(),
    };
    store.save(
        QuestionnaireType::Woman,
        Language::ENGLISH,
        &complete_answers(),
        &complete_additional(),
        &contact(),
        Some(&source),
    );

    // Submit
    let catalog = Catalog::load(&config.catalog_dir, QuestionnaireType::Woman).unwrap();
    let snapshot = store
        .load(QuestionnaireType::Woman, Language::ENGLISH)
        .expect("Snapshot should be stored");

    let errors = validate_form(
        &catalog.sections,
        &snapshot.form_data,
        &snapshot.contact_data,
        Language::ENGLISH,
        &snapshot.additional_data,
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let report = generate_report(
        QuestionnaireType::Woman,
        &catalog.sections,
        &snapshot.form_data,
        &snapshot.additional_data,
        &snapshot.contact_data,
        Language::ENGLISH,
        Some(&snapshot.source_data),
    );
    assert!(report.starts_with("📋 New questionnaire: Woman\n\n📅 Date: "));
    assert!(report.contains("**Personal data**\n**Name**\n➤ **Anna**\n"));
    assert!(report.contains("2. **Symptoms**\n➤ **Fatigue, Other**\n   _dizziness_\n"));
    assert!(report.contains("**Source:** By recommendation\n➤ _Maria_\n"));

    telegram::send_text(&config, &report)
        .await
        .expect("Delivery should succeed");
    store.clear(QuestionnaireType::Woman, Language::ENGLISH);

    assert!(store
        .load(QuestionnaireType::Woman, Language::ENGLISH)
        .is_none());
}

#[tokio::test]
async fn test_partial_delivery_is_reported_per_call() {
    let dir = create_catalog_dir();
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/bottest-telegram-token/sendMessage"))
        .respond_with(telegram_ok())
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bottest-telegram-token/sendPhoto"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: IMAGE_PROCESS_FAILED"
        })))
        .mount(&mock_server)
        .await;

    let text = telegram::send_text(&config, "report").await;
    let photo = telegram::send_attachment(
        &config,
        &Attachment::new("scan.jpg", "image/jpeg", vec![0xff, 0xd8]),
        Some("scan"),
    )
    .await;

    assert_eq!(text, Ok(()));
    assert_eq!(
        photo,
        Err(DeliveryError::AttachmentRejected(
            "Bad Request: IMAGE_PROCESS_FAILED".into()
        ))
    );
}

#[tokio::test]
async fn test_retry_after_failure_is_a_plain_second_call() {
    let dir = create_catalog_dir();
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), &dir);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"ok": false})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(telegram_ok())
        .mount(&mock_server)
        .await;

    assert_eq!(
        telegram::send_text(&config, "report").await,
        Err(DeliveryError::Api("500".into()))
    );
    assert_eq!(telegram::send_text(&config, "report").await, Ok(()));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_unconfigured_delivery_leaves_snapshot() {
    let dir = create_catalog_dir();
    let config = Config {
        telegram_bot_token: String::new(),
        ..create_test_config("http://127.0.0.1:9", &dir)
    };
    let store = FormStore::new(FileStorage::new(&config.storage_dir));
    store.save(
        QuestionnaireType::Woman,
        Language::RUSSIAN,
        &complete_answers(),
        &complete_additional(),
        &contact(),
        None,
    );

    let err = telegram::send_text(&config, "report").await.unwrap_err();
    assert_eq!(err, DeliveryError::Configuration);

    // Nothing was delivered, so nothing is cleared
    assert!(store
        .load(QuestionnaireType::Woman, Language::RUSSIAN)
        .is_some());
}

// ==================== Bundled Catalog Tests ====================

#[test]
fn test_bundled_catalogs_load() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("catalogs");
    for kind in QuestionnaireType::ALL {
        let catalog = Catalog::load(&dir, kind)
            .unwrap_or_else(|e| panic!("catalog for {kind} should load: {e}"));
        assert!(
            catalog.sections.iter().any(|s| s.id == "health"),
            "{kind} catalog needs a health section"
        );
    }
}
