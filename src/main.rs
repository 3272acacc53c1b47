use crate::api::AppState;
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::DocumentFetcher;
use crate::services::{GameService, PlayerService, TeamService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.args.log_level))
        .init();

    info!("Using sources {:?}", config.sources);

    let fetcher = DocumentFetcher::new(config.http_client.clone());
    let state = Arc::new(AppState {
        players: PlayerService::new(
            fetcher.clone(),
            config.sources.clone(),
            config.args.default_season,
        ),
        teams: TeamService::new(fetcher.clone(), config.sources.clone()),
        games: GameService::new(fetcher, config.sources.clone(), config.box_score_timeout()),
    });

    let listener = tokio::net::TcpListener::bind(&config.args.bind).await?;
    info!("Listening on {}", config.args.bind);
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
