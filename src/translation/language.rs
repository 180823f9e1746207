//! Target languages and the writing systems used to detect names that need no translation.

use anyhow::Result;

/// Writing system a language is normally written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Japanese,
    Han,
    Hangul,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Thai,
    Devanagari,
}

impl Script {
    /// Whether `c` belongs to this script.
    ///
    /// Japanese accepts kana and kanji; Latin matches nothing so Latin-script
    /// targets always go through translation.
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Latin => false,
            Self::Japanese => is_kana(c) || is_han(c),
            Self::Han => is_han(c),
            Self::Hangul => matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}'),
            Self::Cyrillic => matches!(c, '\u{0400}'..='\u{04FF}'),
            Self::Greek => matches!(c, '\u{0370}'..='\u{03FF}'),
            Self::Arabic => matches!(c, '\u{0600}'..='\u{06FF}'),
            Self::Hebrew => matches!(c, '\u{0590}'..='\u{05FF}'),
            Self::Thai => matches!(c, '\u{0E00}'..='\u{0E7F}'),
            Self::Devanagari => matches!(c, '\u{0900}'..='\u{097F}'),
        }
    }
}

const fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}')
}

const fn is_han(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

/// A supported translation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 code.
    pub code: &'static str,
    /// English name, as used in prompts.
    pub name: &'static str,
    pub script: Script,
}

/// Supported target languages.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    lang("ar", "Arabic", Script::Arabic),
    lang("bg", "Bulgarian", Script::Cyrillic),
    lang("de", "German", Script::Latin),
    lang("el", "Greek", Script::Greek),
    lang("en", "English", Script::Latin),
    lang("es", "Spanish", Script::Latin),
    lang("fr", "French", Script::Latin),
    lang("he", "Hebrew", Script::Hebrew),
    lang("hi", "Hindi", Script::Devanagari),
    lang("id", "Indonesian", Script::Latin),
    lang("it", "Italian", Script::Latin),
    lang("ja", "Japanese", Script::Japanese),
    lang("ko", "Korean", Script::Hangul),
    lang("nl", "Dutch", Script::Latin),
    lang("pl", "Polish", Script::Latin),
    lang("pt", "Portuguese", Script::Latin),
    lang("ru", "Russian", Script::Cyrillic),
    lang("sv", "Swedish", Script::Latin),
    lang("th", "Thai", Script::Thai),
    lang("tr", "Turkish", Script::Latin),
    lang("uk", "Ukrainian", Script::Cyrillic),
    lang("vi", "Vietnamese", Script::Latin),
    lang("zh", "Chinese", Script::Han),
];

const fn lang(code: &'static str, name: &'static str, script: Script) -> Language {
    Language { code, name, script }
}

/// Looks a language up by ISO code or English name (case-insensitive).
pub fn find_language(input: &str) -> Option<&'static Language> {
    let input = input.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(input) || l.name.eq_ignore_ascii_case(input))
}

/// Validates that the given language is supported.
///
/// # Errors
///
/// Returns an error listing the accepted spellings if the language is unknown.
pub fn validate_language(input: &str) -> Result<&'static Language> {
    find_language(input).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid language: '{input}'\n\n\
             Use an ISO 639-1 code or English name, e.g. ja / Japanese, ko / Korean, fr / French.\n\
             Supported: {}",
            SUPPORTED_LANGUAGES
                .iter()
                .map(|l| l.code)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

/// Returns `true` if `text` is already written in the language's own script.
pub fn is_in_native_script(text: &str, language: &Language) -> bool {
    text.chars().any(|c| language.script.matches(c))
}
