/// All localized user-facing strings for a language.
///
/// Strings are stored raw. Report text is sent with Telegram's legacy
/// `Markdown` parse mode, so none of these contain markup of their own.
/// An empty string means "no translation"; callers fall back explicitly.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Validation Messages ====================
    /// Generic "field is required" message
    pub required: &'static str,

    /// Message for a checkbox question with nothing selected
    pub select_at_least_one: &'static str,

    /// Message when neither Telegram nor Instagram was provided
    pub at_least_one_contact_required: &'static str,

    /// Older contact message, used when `at_least_one_contact_required` is empty
    pub telegram_required: &'static str,

    // ==================== Contact Handle Messages ====================
    pub telegram_too_short: &'static str,
    pub telegram_too_long: &'static str,
    pub telegram_invalid_chars: &'static str,
    pub instagram_too_long: &'static str,
    pub instagram_invalid_chars: &'static str,
    pub instagram_dots: &'static str,

    // ==================== Report Headers ====================
    /// Header for the infant questionnaire
    pub md_infant: &'static str,
    pub md_child: &'static str,
    pub md_woman: &'static str,
    pub md_man: &'static str,

    /// Title prefix of every report ("New questionnaire")
    pub md_new_questionnaire: &'static str,

    /// Label before the capture date
    pub md_date: &'static str,

    /// Heading of the contacts block
    pub md_contacts: &'static str,

    /// Label of the referral source line
    pub md_source: &'static str,

    /// Display name of the `recommendation` referral channel
    pub source_recommendation: &'static str,

    // ==================== Delivery Messages ====================
    /// Delivery credentials are missing
    pub delivery_not_configured: &'static str,

    /// The delivery request exceeded its timeout
    pub delivery_timeout: &'static str,

    /// Prefix of a message-delivery API failure
    pub delivery_api_error: &'static str,

    /// Transport failure without an underlying message
    pub delivery_network_error: &'static str,
}

// ==================== Russian Strings ====================

/// Russian language strings (site default)
pub const RUSSIAN_STRINGS: LanguageStrings = LanguageStrings {
    required: "Обязательное поле",
    select_at_least_one: "Выберите хотя бы один вариант",
    at_least_one_contact_required: "Укажите хотя бы один контакт: Telegram или Instagram",
    telegram_required: "Укажите ваш Telegram",

    telegram_too_short: "Имя пользователя Telegram должно содержать не менее 5 символов",
    telegram_too_long: "Имя пользователя Telegram должно содержать не более 32 символов",
    telegram_invalid_chars: "Допустимы только латинские буквы, цифры и подчёркивание",
    instagram_too_long: "Имя пользователя Instagram должно содержать не более 30 символов",
    instagram_invalid_chars: "Допустимы только латинские буквы, цифры, точки и подчёркивание",
    instagram_dots: "Имя пользователя не может начинаться или заканчиваться точкой и содержать две точки подряд",

    md_infant: "Младенец",
    md_child: "Ребёнок",
    md_woman: "Женщина",
    md_man: "Мужчина",
    md_new_questionnaire: "Новая анкета",
    md_date: "Дата",
    md_contacts: "Контакты",
    md_source: "Откуда узнали",
    source_recommendation: "По рекомендации",

    delivery_not_configured: "Telegram Bot Token или Chat ID не настроены.",
    delivery_timeout: "Превышено время ожидания. Проверьте интернет-соединение.",
    delivery_api_error: "Ошибка Telegram API",
    delivery_network_error: "Ошибка сети",
};

// ==================== English Strings ====================

/// English language strings
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    required: "This field is required",
    select_at_least_one: "Please select at least one option",
    at_least_one_contact_required: "Please provide at least one contact: Telegram or Instagram",
    telegram_required: "Please provide your Telegram",

    telegram_too_short: "Telegram username must be at least 5 characters",
    telegram_too_long: "Telegram username must be at most 32 characters",
    telegram_invalid_chars: "Only Latin letters, digits and underscores are allowed",
    instagram_too_long: "Instagram username must be at most 30 characters",
    instagram_invalid_chars: "Only Latin letters, digits, dots and underscores are allowed",
    instagram_dots: "Username cannot start or end with a dot or contain two dots in a row",

    md_infant: "Infant",
    md_child: "Child",
    md_woman: "Woman",
    md_man: "Man",
    md_new_questionnaire: "New questionnaire",
    md_date: "Date",
    md_contacts: "Contacts",
    md_source: "Source",
    source_recommendation: "By recommendation",

    delivery_not_configured: "Telegram Bot Token or Chat ID not configured.",
    delivery_timeout: "Request timed out. Check your internet connection.",
    delivery_api_error: "Telegram API error",
    delivery_network_error: "Network error",
};
