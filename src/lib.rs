pub mod catalog_api;
pub mod cli;
pub mod config;
pub mod error_classifier;
pub mod guide;
pub mod image_slot;
pub mod logger;
pub mod models;
pub mod session;
pub mod tui;

#[cfg(test)]
pub(crate) mod mocks;

use catalog_api::{CatalogClient, HttpCatalogClient};
use clap::Parser;
use cli::{Cli, Command};
use config::Settings;
use models::Achievement;
use std::sync::Arc;

pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    if let Some(path) = logger::init(interactive, cli.log_file.clone()) {
        log::debug!("Logging to {}", path.display());
    }

    let settings = Settings::resolve(cli.config.as_deref(), cli.backend_url.as_deref())?;
    log::info!("Using catalog backend {}", settings.backend_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    runtime.block_on(async move {
        let client: Arc<dyn CatalogClient> = Arc::new(HttpCatalogClient::from_settings(&settings));
        match cli.command {
            None => tui::run(settings, client).await,
            Some(command) => run_command(command, &settings, client.as_ref()).await,
        }
    })
}

async fn run_command(
    command: Command,
    settings: &Settings,
    client: &dyn CatalogClient,
) -> Result<(), String> {
    let output = match command {
        Command::Search { query } => {
            if !session::state::is_searchable(&query) {
                return Err(format!(
                    "Query must be at least {} characters",
                    session::state::MIN_QUERY_CHARS
                ));
            }
            let entries = client
                .search(&query)
                .await
                .map_err(|e| e.user_message(session::search::SEARCH_FALLBACK_MESSAGE))?;
            serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?
        }
        Command::Achievements { appid } => {
            let resp = client
                .fetch_details(appid)
                .await
                .map_err(|e| e.user_message(session::achievements::DETAIL_FALLBACK_MESSAGE))?;
            serde_json::to_string_pretty(&resp).map_err(|e| e.to_string())?
        }
        Command::Guide { achievement, game } => {
            let achievement = Achievement {
                internal_name: achievement.clone(),
                display_name: Some(achievement),
                ..Default::default()
            };
            guide::guide_url(&settings.guide_search_url, &achievement, &game)
        }
    };

    println!("{}", output);
    Ok(())
}
