//! Submit a stored questionnaire: validate it, render the report and send it
//! to the configured Telegram chat.
//!
//! Usage:
//!   submit <infant|child|woman|man> <ru|en> [attachment-path]
//!
//! Required environment variables:
//! - TELEGRAM_BOT_TOKEN
//! - TELEGRAM_CHAT_ID
//!
//! Optional:
//! - QUESTIONNAIRE_STORAGE_DIR (defaults to data/snapshots)
//! - QUESTIONNAIRE_CATALOG_DIR (defaults to catalogs)

use anyhow::{bail, Context, Result};
use health_questionnaire::catalog::Catalog;
use health_questionnaire::config::Config;
use health_questionnaire::form::QuestionnaireType;
use health_questionnaire::i18n::{Language, LanguageRegistry};
use health_questionnaire::report::generate_report;
use health_questionnaire::store::{FileStorage, FormStore};
use health_questionnaire::telegram::{self, Attachment};
use health_questionnaire::validation::validate_form;
use std::path::PathBuf;
use tracing::{error, info, warn};

struct Args {
    kind: QuestionnaireType,
    lang: Language,
    attachment: Option<PathBuf>,
}

fn usage() -> String {
    let kinds: Vec<_> = QuestionnaireType::ALL.iter().map(|k| k.as_str()).collect();
    let langs: Vec<_> = LanguageRegistry::get()
        .list_enabled()
        .iter()
        .map(|l| l.code)
        .collect();
    format!(
        "Usage: submit <{}> <{}> [attachment-path]",
        kinds.join("|"),
        langs.join("|")
    )
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        bail!(usage());
    }

    Ok(Args {
        kind: args[0].parse()?,
        lang: args[1].parse()?,
        attachment: args.get(2).map(PathBuf::from),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("health_questionnaire=info".parse()?)
                .add_directive("submit=info".parse()?),
        )
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.catalog_dir, args.kind)?;
    let store = FormStore::new(FileStorage::new(&config.storage_dir));

    let snapshot = store.load(args.kind, args.lang).context(format!(
        "No questionnaire in progress for {} ({}) in the last 24 hours",
        args.kind, args.lang
    ))?;

    // Step 1: Validate
    let errors = validate_form(
        &catalog.sections,
        &snapshot.form_data,
        &snapshot.contact_data,
        args.lang,
        &snapshot.additional_data,
    );
    if !errors.is_empty() {
        for (field, message) in errors.messages(args.lang) {
            warn!("{}: {}", field, message);
        }
        bail!("Questionnaire has {} invalid field(s)", errors.len());
    }

    // Step 2: Render
    let report = generate_report(
        args.kind,
        &catalog.sections,
        &snapshot.form_data,
        &snapshot.additional_data,
        &snapshot.contact_data,
        args.lang,
        Some(&snapshot.source_data),
    );

    // Step 3: Deliver the report, then the optional attachment
    info!("Sending {} questionnaire via Telegram", args.kind);
    if let Err(e) = telegram::send_text(&config, &report).await {
        bail!(e.localized(args.lang));
    }
    store.clear(args.kind, args.lang);
    info!("Questionnaire delivered");

    if let Some(path) = args.attachment {
        let attachment = Attachment::from_path(&path)?;
        if let Err(e) = telegram::send_attachment(&config, &attachment, None).await {
            error!("Report was delivered, but the attachment was not");
            bail!(e.localized(args.lang));
        }
        info!("Attachment {} delivered", attachment.file_name);
    }

    Ok(())
}
