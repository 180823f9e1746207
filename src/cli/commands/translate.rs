use anyhow::{Result, bail};
use std::path::Path;

use super::load_settings;
use crate::bot::AppContext;
use crate::config::ResolveOptions;

pub struct TranslateOptions<'a> {
    pub config: Option<&'a Path>,
    pub name: String,
    pub to: Option<String>,
}

/// Translates one name exactly as a join would, including the fallback.
pub async fn run_translate(options: TranslateOptions<'_>) -> Result<()> {
    if options.name.trim().is_empty() {
        bail!("Error: Name is empty");
    }

    let settings = load_settings(
        options.config,
        &ResolveOptions {
            language: options.to,
        },
    )?;
    let language = settings.language;

    let app = AppContext::new(settings);
    let Some(translator) = app.translator() else {
        bail!(
            "Error: Feature 'translation' is not configured\n\n\
             Add a [features.translation] section with a provider and model"
        );
    };

    let translated = translator.translate(&options.name, language).await;
    println!("{translated}");
    Ok(())
}
