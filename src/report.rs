//! Render a finished questionnaire as a Telegram `Markdown` message.

use crate::catalog::{Question, Section};
use crate::form::{
    additional_key, additional_value, clean_handle, AdditionalText, Answer, AnswerSet,
    ContactInfo, QuestionnaireType, SourceInfo,
};
use crate::i18n::Language;
use chrono::{DateTime, Local, TimeZone};

/// Numbering of questions starts with this section.
pub const NUMBERED_FROM_SECTION: &str = "health";

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━";
const DATE_FORMAT: &str = "%d.%m.%Y, %H:%M";

/// Header naming the questionnaire type.
pub fn type_header(kind: QuestionnaireType, lang: Language) -> &'static str {
    let t = lang.strings();
    match kind {
        QuestionnaireType::Infant => t.md_infant,
        QuestionnaireType::Child => t.md_child,
        QuestionnaireType::Woman => t.md_woman,
        QuestionnaireType::Man => t.md_man,
    }
}

/// Build the report, stamped with the current local time.
pub fn generate_report(
    kind: QuestionnaireType,
    sections: &[Section],
    answers: &AnswerSet,
    additional: &AdditionalText,
    contact: &ContactInfo,
    lang: Language,
    source: Option<&SourceInfo>,
) -> String {
    generate_report_at(
        kind,
        sections,
        answers,
        additional,
        contact,
        lang,
        source,
        &Local::now(),
    )
}

/// Build the report with an explicit timestamp.
#[allow(clippy::too_many_arguments)]
pub fn generate_report_at<Tz: TimeZone>(
    kind: QuestionnaireType,
    sections: &[Section],
    answers: &AnswerSet,
    additional: &AdditionalText,
    contact: &ContactInfo,
    lang: Language,
    source: Option<&SourceInfo>,
    timestamp: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let t = lang.strings();
    let mut md = format!(
        "📋 {}: {}\n\n📅 {}: {}\n\n",
        t.md_new_questionnaire,
        type_header(kind, lang),
        t.md_date,
        timestamp.format(DATE_FORMAT)
    );

    md.push_str(&render_sections(sections, answers, additional, lang));

    if let Some(source) = source {
        md.push_str(&render_source(source, lang));
    }

    md.push_str(&render_contacts(contact, lang));
    md
}

fn given_answer<'a>(answers: &'a AnswerSet, question: &Question) -> Option<&'a Answer> {
    answers.get(&question.id).filter(|a| a.is_given())
}

fn format_answer(question: &Question, answer: &Answer, lang: Language) -> String {
    match answer {
        Answer::Multiple(values) => values
            .iter()
            .map(|v| question.option_label(v, lang))
            .collect::<Vec<_>>()
            .join(", "),
        Answer::Single(value) => question.option_label(value, lang).to_string(),
    }
}

fn render_sections(
    sections: &[Section],
    answers: &AnswerSet,
    additional: &AdditionalText,
    lang: Language,
) -> String {
    let mut md = String::new();
    let mut counter = 1;
    let mut numbering = false;
    let mut first_section = true;

    for section in sections {
        let has_answers = section
            .questions
            .iter()
            .any(|q| given_answer(answers, q).is_some());
        if !has_answers {
            continue;
        }

        if !first_section {
            md.push('\n');
        }
        first_section = false;
        md.push_str(&format!("**{}**\n", section.title.get(lang)));

        if section.id == NUMBERED_FROM_SECTION {
            numbering = true;
        }

        for question in &section.questions {
            let Some(answer) = given_answer(answers, question) else {
                continue;
            };

            if numbering {
                md.push_str(&format!("{}. ", counter));
                counter += 1;
            }
            md.push_str(&format!(
                "**{}**\n➤ **{}**",
                question.label.get(lang),
                format_answer(question, answer, lang)
            ));
            if let Some(text) = additional_value(additional, &additional_key(&question.id)) {
                md.push_str(&format!("\n   _{}_", text));
            }
            md.push('\n');
        }
    }

    md
}

fn render_source(source: &SourceInfo, lang: Language) -> String {
    if source.source.is_empty() {
        return String::new();
    }

    let t = lang.strings();
    let channel = match source.source.as_str() {
        "telegram" => "Telegram",
        "instagram" => "Instagram",
        "recommendation" => t.source_recommendation,
        other => other,
    };

    let mut md = format!("\n**{}:** {}", t.md_source, channel);
    let recommender = source.recommender.trim();
    if source.source == "recommendation" && !recommender.is_empty() {
        md.push_str(&format!("\n➤ _{}_", recommender));
    }
    md.push('\n');
    md
}

fn render_contacts(contact: &ContactInfo, lang: Language) -> String {
    let mut contacts = Vec::new();
    if contact.has_telegram() {
        let handle = clean_handle(&contact.telegram);
        contacts.push(format!("📱 Telegram: @{0}\n🔗 https://t.me/{0}", handle));
    }
    if contact.has_instagram() {
        let handle = clean_handle(&contact.instagram);
        contacts.push(format!("📷 Instagram: @{0}\n🔗 https://instagram.com/{0}", handle));
    }

    if contacts.is_empty() {
        return String::new();
    }

    let mut md = format!("\n{}\n**{}**\n", DIVIDER, lang.strings().md_contacts);
    for entry in contacts {
        md.push_str(&format!("➤ {}\n", entry));
    }
    md
}
