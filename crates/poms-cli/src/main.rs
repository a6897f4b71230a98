//! P.O.M.S CLI - Ask about orders, holdings and performance in plain English.

use clap::Parser;
use poms_cli::commands;
use poms_cli::repl;
use poms_cli::session::build_router;
use poms_cli::{Cli, Command, Config, Formatter};
use poms_domain::KeywordClassifier;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Credentials may live in a .env file
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> poms_cli::Result<()> {
    let cli = Cli::parse();

    // A missing file means first run; a broken one is fatal
    let mut config = match &cli.config {
        Some(path) => Config::load_or_default(path)?,
        None => Config::load()?,
    };

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, &formatter).await?;
        }
        Some(Command::Query(args)) => {
            let router = build_router(&config)?;
            commands::execute_query(&args.text(), &router, &formatter).await?;
        }
        Some(Command::Classify(args)) => {
            commands::execute_classify(&args.text(), &KeywordClassifier::default(), &formatter)?;
        }
        Some(Command::Examples) => {
            commands::execute_examples(&formatter)?;
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
    }

    Ok(())
}
