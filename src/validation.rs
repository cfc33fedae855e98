//! Form validation: required answers, conditional elaborations and
//! contact handles.
//!
//! Every rule is evaluated on every call; rules never short-circuit each
//! other. The result is keyed by field id in a `BTreeMap`, so identical
//! input always yields an identical report.

use crate::catalog::{Question, QuestionKind, Section};
use crate::contact::{validate_instagram_username, validate_telegram_username, ContactError};
use crate::form::{additional_key, additional_value, AdditionalText, Answer, AnswerSet, ContactInfo};
use crate::i18n::Language;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Error key used when no contact handle was given at all.
pub const CONTACT_KEY: &str = "contact";
pub const TELEGRAM_KEY: &str = "telegram";
pub const INSTAGRAM_KEY: &str = "instagram";

/// Per-field error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Required,
    SelectAtLeastOne,
    AtLeastOneContactRequired,
    Contact(ContactError),
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::SelectAtLeastOne => "selectAtLeastOne",
            ErrorCode::AtLeastOneContactRequired => "atLeastOneContactRequired",
            ErrorCode::Contact(e) => e.code(),
        }
    }

    /// Translated message shown next to the offending field.
    pub fn message(&self, lang: Language) -> &'static str {
        let t = lang.strings();
        match self {
            ErrorCode::Required => t.required,
            ErrorCode::SelectAtLeastOne => t.select_at_least_one,
            ErrorCode::AtLeastOneContactRequired => {
                if t.at_least_one_contact_required.is_empty() {
                    t.telegram_required
                } else {
                    t.at_least_one_contact_required
                }
            }
            ErrorCode::Contact(e) => e.message(lang).unwrap_or(t.required),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Field id -> error code. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport(BTreeMap<String, ErrorCode>);

impl ErrorReport {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<ErrorCode> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ErrorCode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Field id -> translated message.
    pub fn messages(&self, lang: Language) -> BTreeMap<String, &'static str> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.message(lang)))
            .collect()
    }

    fn insert(&mut self, field: impl Into<String>, code: ErrorCode) {
        self.0.insert(field.into(), code);
    }
}

// ==================== Conditional Rule Table ====================

/// Condition on the trigger question's answer.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Single-valued answer equal to the value.
    Equals(&'static str),
    /// Any given value (single or selected) other than this one.
    AnyExcept(&'static str),
    /// The single answer, or one of the selected values, is in the list.
    AnyOf(&'static [&'static str]),
    /// Multi-select answer containing one of the listed values. Single
    /// answers never match.
    AnySelected(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (_, Answer::Single(v)) if v.is_empty() => false,
            (Trigger::Equals(expected), Answer::Single(v)) => v == expected,
            (Trigger::Equals(_), Answer::Multiple(_)) => false,
            (Trigger::AnyExcept(excluded), answer) => {
                answer.values().iter().any(|v| v != excluded)
            }
            (Trigger::AnyOf(values), answer) => values.iter().any(|v| answer.contains(v)),
            (Trigger::AnySelected(values), Answer::Multiple(selected)) => {
                selected.iter().any(|s| values.iter().any(|v| s == v))
            }
            (Trigger::AnySelected(_), Answer::Single(_)) => false,
        }
    }
}

/// "If `question` matches `when`, the free-text field `target` must be filled."
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRule {
    pub question: &'static str,
    pub when: Trigger,
    pub target: &'static str,
}

/// Named elaboration rules, independent of the generic `other` rule.
pub const CONDITIONAL_RULES: &[ConditionalRule] = &[
    ConditionalRule {
        question: "operations",
        when: Trigger::Equals("yes"),
        target: "operations_additional",
    },
    ConditionalRule {
        question: "injuries",
        when: Trigger::AnyExcept("no_issues"),
        target: "injuries_additional",
    },
    ConditionalRule {
        question: "medications",
        when: Trigger::Equals("yes"),
        target: "medications_additional",
    },
    ConditionalRule {
        question: "what_else",
        when: Trigger::Equals("yes"),
        target: "what_else_additional",
    },
    ConditionalRule {
        question: "pregnancy_problems",
        when: Trigger::Equals("yes"),
        target: "pregnancy_problems_additional",
    },
    ConditionalRule {
        question: "illness_antibiotics",
        when: Trigger::AnyOf(&["took_antibiotics", "took_other_medications"]),
        target: "illness_antibiotics_additional",
    },
    ConditionalRule {
        question: "weight_satisfaction",
        when: Trigger::AnySelected(&["want_to_lose", "want_to_gain"]),
        target: "weight_satisfaction_additional",
    },
    ConditionalRule {
        question: "stones",
        when: Trigger::AnySelected(&["stones_kidneys", "stones_gallbladder", "both"]),
        target: "stones_additional",
    },
    ConditionalRule {
        question: "operations_injuries",
        when: Trigger::AnySelected(&["operations", "organ_removed", "injuries"]),
        target: "operations_injuries_additional",
    },
    ConditionalRule {
        question: "pressure",
        when: Trigger::AnySelected(&["high"]),
        target: "pressure_additional",
    },
    ConditionalRule {
        question: "cysts_polyps",
        when: Trigger::AnySelected(&["cysts", "polyps", "fibroids", "tumors", "hernias"]),
        target: "cysts_polyps_additional",
    },
];

/// Past infection unlocks the covid follow-up questions.
const COVID_STATUS: &str = "covid_status";
const COVID_PAST_INFECTION: &[&str] = &["had_covid", "both"];
const COVID_TIMES: &str = "covid_times";
const COVID_COMPLICATIONS: &str = "covid_complications";

// ==================== Validation ====================

/// Validate a questionnaire submission.
pub fn validate_form(
    sections: &[Section],
    answers: &AnswerSet,
    contact: &ContactInfo,
    lang: Language,
    additional: &AdditionalText,
) -> ErrorReport {
    let mut errors = ErrorReport::default();

    check_required(sections, answers, &mut errors);
    check_other_options(sections, answers, additional, &mut errors);
    check_conditional_rules(CONDITIONAL_RULES, answers, additional, &mut errors);
    check_covid_follow_up(answers, &mut errors);
    check_contact(contact, lang, &mut errors);

    errors
}

/// Error for a missing or malformed answer of a given question type.
fn missing_answer(kind: QuestionKind, answer: Option<&Answer>) -> Option<ErrorCode> {
    match kind {
        QuestionKind::Checkbox => {
            (!answer.is_some_and(Answer::is_given)).then_some(ErrorCode::SelectAtLeastOne)
        }
        QuestionKind::Number => {
            let numeric = matches!(answer, Some(Answer::Single(v)) if is_numeric(v));
            (!numeric).then_some(ErrorCode::Required)
        }
        QuestionKind::Text | QuestionKind::Radio => {
            (!answer.is_some_and(Answer::is_given)).then_some(ErrorCode::Required)
        }
    }
}

fn is_numeric(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| !n.is_nan())
        .unwrap_or(false)
}

fn check_required(sections: &[Section], answers: &AnswerSet, errors: &mut ErrorReport) {
    for question in sections.iter().flat_map(|s| s.questions.iter()) {
        if !question.required {
            continue;
        }
        if let Some(code) = missing_answer(question.kind, answers.get(&question.id)) {
            errors.insert(question.id.as_str(), code);
        }
    }
}

fn offers_other(question: &Question) -> bool {
    question.is_choice() && question.has_option("other")
}

fn check_other_options(
    sections: &[Section],
    answers: &AnswerSet,
    additional: &AdditionalText,
    errors: &mut ErrorReport,
) {
    for question in sections.iter().flat_map(|s| s.questions.iter()) {
        if !offers_other(question) {
            continue;
        }
        let picked_other = answers
            .get(&question.id)
            .is_some_and(|answer| answer.contains("other"));
        if !picked_other {
            continue;
        }
        let key = additional_key(&question.id);
        if additional_value(additional, &key).is_none() {
            errors.insert(key, ErrorCode::Required);
        }
    }
}

fn check_conditional_rules(
    rules: &[ConditionalRule],
    answers: &AnswerSet,
    additional: &AdditionalText,
    errors: &mut ErrorReport,
) {
    for rule in rules {
        let triggered = answers
            .get(rule.question)
            .is_some_and(|answer| rule.when.matches(answer));
        if triggered && additional_value(additional, rule.target).is_none() {
            errors.insert(rule.target, ErrorCode::Required);
        }
    }
}

fn check_covid_follow_up(answers: &AnswerSet, errors: &mut ErrorReport) {
    let had_covid = answers
        .get(COVID_STATUS)
        .is_some_and(|answer| Trigger::AnyOf(COVID_PAST_INFECTION).matches(answer));
    if !had_covid {
        return;
    }

    if let Some(code) = missing_answer(QuestionKind::Number, answers.get(COVID_TIMES)) {
        errors.insert(COVID_TIMES, code);
    }
    if let Some(code) = missing_answer(QuestionKind::Checkbox, answers.get(COVID_COMPLICATIONS)) {
        errors.insert(COVID_COMPLICATIONS, code);
    }
}

fn check_contact(contact: &ContactInfo, lang: Language, errors: &mut ErrorReport) {
    if !contact.has_telegram() && !contact.has_instagram() {
        errors.insert(CONTACT_KEY, ErrorCode::AtLeastOneContactRequired);
        return;
    }

    let checks = [
        (TELEGRAM_KEY, contact.has_telegram(), validate_telegram_username(&contact.telegram)),
        (INSTAGRAM_KEY, contact.has_instagram(), validate_instagram_username(&contact.instagram)),
    ];
    for (key, present, result) in checks {
        if !present {
            continue;
        }
        match result.error {
            None | Some(ContactError::Empty) => {}
            Some(error) => {
                let code = if error.message(lang).is_some() {
                    ErrorCode::Contact(error)
                } else {
                    ErrorCode::Required
                };
                errors.insert(key, code);
            }
        }
    }
}
