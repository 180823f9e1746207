use anyhow::{Context as _, Result, anyhow};
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;
use tracing::{error, info};

use super::context::AppContext;
use super::handler::Handler;

/// Connects to Discord and runs until the gateway closes or Ctrl+C is pressed.
///
/// # Errors
///
/// Returns an error if no token is configured or the client fails to start.
pub async fn start_bot(app: Arc<AppContext>) -> Result<()> {
    let token = app.settings().discord_token.clone().ok_or_else(|| {
        let env_var = &app.settings().token_env;
        anyhow!(
            "Discord bot token not found\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-bot-token\"\n\n\
             Or set token under [bot] in the config file"
        )
    })?;

    // GUILD_MEMBERS and MESSAGE_CONTENT are privileged intents - enable them
    // in the Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler::new(Arc::clone(&app)))
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested, closing gateway connections");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    info!("Starting Discord bot...");
    let result = client.start().await.context("Discord client stopped with an error");

    app.shutdown();
    result
}
