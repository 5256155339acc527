pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands, HistoryCommands, HistoryKind};
use clients::MediaApiClient;
pub use config::Config;
pub use db::{HistoryError, HistoryStore};
use services::HttpMediaService;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config);

    match &config.source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = HistoryStore::from_config(&config.general);

    match command {
        Commands::Search { query, json } => {
            let service = media_service(&config, &store, None)?;
            cli::commands::cmd_search(&service, &query.join(" "), json).await
        }

        Commands::Info { url, json } => {
            let service = media_service(&config, &store, None)?;
            cli::commands::cmd_info(&service, &url, json).await
        }

        Commands::Formats { url } => {
            let service = media_service(&config, &store, None)?;
            cli::commands::cmd_formats(&service, &url).await
        }

        Commands::Download {
            url,
            preset,
            output,
        } => {
            let service = media_service(&config, &store, output)?;
            cli::commands::cmd_download(&service, &url, &preset).await
        }

        Commands::Presets => {
            cli::commands::cmd_presets();
            Ok(())
        }

        Commands::History {
            command,
            kind,
            limit,
            json,
        } => {
            let command = command.unwrap_or(HistoryCommands::List {
                kind: kind.unwrap_or(HistoryKind::Searches),
                limit,
                json,
            });

            match command {
                HistoryCommands::List { kind, limit, json } => {
                    let limit = limit.unwrap_or(config.history.default_limit);
                    cli::commands::cmd_history_list(&store, kind, limit, json).await
                }
                HistoryCommands::Delete { kind, id } => {
                    cli::commands::cmd_history_delete(&store, kind, id).await
                }
                HistoryCommands::Clear { target } => {
                    cli::commands::cmd_history_clear(&store, target).await
                }
                HistoryCommands::Stats => cli::commands::cmd_history_stats(&store).await,
            }
        }

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }
    }
}

fn media_service(
    config: &Config,
    store: &HistoryStore,
    output: Option<String>,
) -> anyhow::Result<HttpMediaService> {
    let client = MediaApiClient::new(&config.api)?;
    let download_dir = PathBuf::from(output.unwrap_or_else(|| config.downloads.output_dir.clone()));
    Ok(HttpMediaService::new(client, store.clone(), download_dir))
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
