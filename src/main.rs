//! wikirag CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wikirag::cli::{commands, Cli, Commands};
use wikirag::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // -v flags win over the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("wikirag={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
        }

        Commands::Sections {
            input,
            title,
            chunks,
            json,
        } => {
            commands::run_sections(input, title, *chunks, *json, settings)?;
        }

        Commands::Index {
            input,
            title,
            output,
        } => {
            commands::run_index(input, title, output.clone(), settings).await?;
        }

        Commands::Search {
            query,
            limit,
            corpus,
        } => {
            commands::run_search(query, *limit, corpus.clone(), settings).await?;
        }

        Commands::Ask {
            question,
            model,
            corpus,
            show_message,
        } => {
            commands::run_ask(question, model.clone(), corpus.clone(), *show_message, settings)
                .await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
