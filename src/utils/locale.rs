/// Discord client locales and their display names.
const DISCORD_LOCALES: &[(&str, &str)] = &[
    ("id", "Indonesian"),
    ("da", "Danish"),
    ("de", "German"),
    ("en-GB", "English, UK"),
    ("en-US", "English, US"),
    ("es-ES", "Spanish"),
    ("es-419", "Spanish, LATAM"),
    ("fr", "French"),
    ("hr", "Croatian"),
    ("it", "Italian"),
    ("lt", "Lithuanian"),
    ("hu", "Hungarian"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt-BR", "Portuguese, Brazilian"),
    ("ro", "Romanian, Romania"),
    ("fi", "Finnish"),
    ("sv-SE", "Swedish"),
    ("vi", "Vietnamese"),
    ("tr", "Turkish"),
    ("cs", "Czech"),
    ("el", "Greek"),
    ("bg", "Bulgarian"),
    ("ru", "Russian"),
    ("uk", "Ukrainian"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("zh-CN", "Chinese, China"),
    ("ja", "Japanese"),
    ("zh-TW", "Chinese, Taiwan"),
    ("ko", "Korean"),
];

pub const DEFAULT_LANGUAGE: &str = "English";

/// Language name for a Discord locale, e.g. `en-US` -> `English`.
pub fn language_from_locale(locale: Option<&str>) -> String {
    locale
        .and_then(|code| DISCORD_LOCALES.iter().find(|(c, _)| *c == code))
        .and_then(|(_, name)| name.split(',').next())
        .unwrap_or(DEFAULT_LANGUAGE)
        .trim()
        .to_string()
}
