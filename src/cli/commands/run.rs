use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::load_settings;
use crate::bot::{AppContext, start_bot};
use crate::config::ResolveOptions;

pub async fn run_bot(config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, &ResolveOptions::default())?;
    info!(
        language = settings.language.name,
        guild_id = ?settings.guild_id,
        "Configuration loaded"
    );

    let app = Arc::new(AppContext::new(settings));
    start_bot(app).await
}
