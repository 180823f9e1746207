use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nickbot")]
#[command(about = "Discord community bot with LLM-translated nicknames, greetings and chat")]
#[command(version)]
pub struct Args {
    /// Config file path (defaults to ~/.config/nickbot/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to Discord and handle events (default)
    Run,
    /// Validate the configuration and print the resolved settings
    Check,
    /// Translate a single name through the cache and fallback path
    Translate {
        /// The name to translate
        name: String,

        /// Target language (ISO 639-1 code or English name, e.g. ja, Korean)
        #[arg(short = 't', long = "to")]
        to: Option<String>,
    },
    /// List supported target languages
    Languages,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let args = Args::try_parse_from(["nickbot"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["nickbot", "check", "-v", "--config", "bot.toml"]).unwrap();
        assert!(matches!(args.command, Some(Command::Check)));
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("bot.toml")));
    }

    #[test]
    fn test_translate_args() {
        let args = Args::try_parse_from(["nickbot", "translate", "Robert", "--to", "ko"]).unwrap();
        match args.command {
            Some(Command::Translate { name, to }) => {
                assert_eq!(name, "Robert");
                assert_eq!(to.as_deref(), Some("ko"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
