//! Member-name translation: prompts, language table, cache-backed translator
//! and the transliteration fallback.

mod language;
mod prompt;
mod translator;
mod transliterate;

pub use language::{
    Language, SUPPORTED_LANGUAGES, Script, find_language, is_in_native_script, validate_language,
};
pub use prompt::{build_goodbye_prompt, build_name_prompt, build_welcome_prompt};
pub use translator::Translator;
pub use transliterate::transliterate;
