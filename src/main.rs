use anyhow::Result;
use clap::Parser;

use nickbot::cli::commands::{check, languages, run, translate};
use nickbot::cli::{Args, Command};
use nickbot::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the environment
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    logging::init(args.verbose);

    let config = args.config.as_deref();

    match args.command {
        Some(Command::Languages) => {
            languages::print_languages();
        }
        Some(Command::Check) => {
            check::run_check(config)?;
        }
        Some(Command::Translate { name, to }) => {
            let options = translate::TranslateOptions { config, name, to };
            translate::run_translate(options).await?;
        }
        Some(Command::Run) | None => {
            run::run_bot(config).await?;
        }
    }

    Ok(())
}
