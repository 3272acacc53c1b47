use crate::domain::Identifier;
use crate::error::Result;
use crate::services::{GameService, PlayerService, TeamService};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub struct AppState {
    pub players: PlayerService,
    pub teams: TeamService,
    pub games: GameService,
}

#[derive(Debug, Default, Deserialize)]
pub struct Options {
    pretty: Option<String>,
    index: Option<u32>,
}

fn wants_pretty(pretty: Option<&str>) -> bool {
    matches!(pretty, Some("true" | "1" | "yes"))
}

impl Options {
    fn is_pretty(&self) -> bool {
        wants_pretty(self.pretty.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayByPlayQuery {
    #[serde(rename = "gameId")]
    game_id: String,
    pretty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSummaryQuery {
    player: String,
    pretty: Option<String>,
    index: Option<u32>,
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<Response> {
    if pretty {
        let body = serde_json::to_string_pretty(value)?;
        Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
    } else {
        Ok(Json(value).into_response())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn player_latest(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let identifier = Identifier::new(&name).with_index(options.index);
    let stats = state.players.latest(&identifier).await?;
    render(&stats, options.is_pretty())
}

async fn player_season(
    State(state): State<Arc<AppState>>,
    Path((name, year)): Path<(String, u16)>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let identifier = Identifier::new(&name).with_index(options.index);
    let stats = state.players.season(&identifier, year).await?;
    render(&stats, options.is_pretty())
}

async fn player_career(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let identifier = Identifier::new(&name).with_index(options.index);
    let career = state.players.career_totals(&identifier).await?;
    render(&career, options.is_pretty())
}

async fn player_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerSummaryQuery>,
) -> Result<Response> {
    let identifier = Identifier::new(&query.player).with_index(query.index);
    let summary = state.players.summary(&identifier).await?;
    render(&summary, wants_pretty(query.pretty.as_deref()))
}

async fn team_season(
    State(state): State<Arc<AppState>>,
    Path((name, year)): Path<(String, u16)>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let season = state.teams.season(&name, year).await?;
    render(&season, options.is_pretty())
}

async fn team_schedule(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let today = Local::now().date_naive();
    let schedule = state.teams.schedule(&team.to_lowercase(), today).await?;
    render(&schedule, options.is_pretty())
}

async fn box_score(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(options): Query<Options>,
) -> Result<Response> {
    let box_score = state.games.box_score(&game_id).await?;
    render(&box_score, options.is_pretty())
}

async fn play_by_play(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayByPlayQuery>,
) -> Result<Response> {
    let plays = state.games.play_by_play(&query.game_id).await?;
    render(&plays, wants_pretty(query.pretty.as_deref()))
}

/// Last-resort handler: a panic anywhere below becomes a 500 with its message.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown error".to_string());
    error!("Handler panicked: {message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/players/:name", get(player_latest))
        .route("/players/:name/season/:year", get(player_season))
        .route("/players/:name/career_totals", get(player_career))
        .route("/player-stats", get(player_summary))
        .route("/player-stats/", get(player_summary))
        .route("/teams/:name/season/:year", get(team_season))
        .route("/nba/schedule/:team_slug", get(team_schedule))
        .route("/nba/game/:game_id", get(box_score))
        .route("/playbyplay", get(play_by_play))
        .route("/playbyplay/", get(play_by_play))
        .with_state(state);
    with_middleware(routes)
}
