use crate::translation::SUPPORTED_LANGUAGES;
use crate::ui::Style;

pub fn print_languages() {
    println!("{}", Style::header("Supported target languages"));
    for language in SUPPORTED_LANGUAGES {
        println!(
            "  {:5} {}",
            Style::code(language.code),
            Style::secondary(language.name)
        );
    }
}
