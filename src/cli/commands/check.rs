use anyhow::Result;
use std::path::Path;

use super::load_settings;
use crate::config::{Feature, ResolveOptions, Settings};
use crate::ui::Style;

pub fn run_check(config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, &ResolveOptions::default())?;
    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &Settings) {
    let token = if settings.discord_token.is_some() {
        Style::success("set")
    } else {
        Style::warning(format!("missing (set {})", settings.token_env))
    };

    println!("{}", Style::header("Bot"));
    println!("  {:18} {token}", Style::label("token"));
    println!("  {:18} {}", Style::label("guild"), optional(settings.guild_id));
    println!("  {:18} {}", Style::label("prefix"), Style::value(&settings.command_prefix));
    println!(
        "  {:18} {}",
        Style::label("welcome channel"),
        optional(settings.welcome_channel_id)
    );
    println!(
        "  {:18} {}",
        Style::label("goodbye channel"),
        optional(settings.goodbye_channel_id)
    );

    println!();
    println!("{}", Style::header("Translation"));
    println!(
        "  {:18} {} ({})",
        Style::label("language"),
        Style::value(settings.language.name),
        Style::code(settings.language.code)
    );
    println!("  {:18} {}", Style::label("cache capacity"), settings.cache_capacity);
    println!("  {:18} {}", Style::label("max name length"), settings.max_name_length);

    println!();
    println!("{}", Style::header("Rate limit"));
    println!(
        "  {:18} {} per {}s",
        Style::label("requests"),
        settings.rate_limit.max_requests,
        settings.rate_limit.window.as_secs()
    );

    println!();
    println!("{}", Style::header("Chatbot"));
    println!("  {:18} {}", Style::label("name"), Style::value(&settings.chatbot.profile.bot_name));
    println!("  {:18} {}", Style::label("max history"), settings.chatbot.max_history);
    println!("  {:18} {:?}", Style::label("channels"), settings.chatbot.channels);

    println!();
    println!("{}", Style::header("Features"));
    for feature in Feature::ALL {
        match settings.features.get(feature) {
            Some(options) => println!(
                "  {:18} {} {}",
                Style::label(feature.as_str()),
                Style::value(&options.model),
                Style::secondary(&options.endpoint)
            ),
            None => println!(
                "  {:18} {}",
                Style::label(feature.as_str()),
                Style::secondary("not configured")
            ),
        }
    }
}

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| Style::secondary("(none)"), Style::value)
}
