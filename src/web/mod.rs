//! JSON API over the dashboard state

use crate::gateway::{Acquired, DataGateway, FallbackCause};
use crate::models::{Game, ParlayLeg, Sport, SuggestionBundle, Theme};
use crate::state::{theme_catalog, DashboardState, GameAnalysisView};
use crate::utils::parlay::SlipSummary;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<DataGateway>,
    pub dashboard: Arc<RwLock<DashboardState>>,
}

impl AppState {
    pub fn new(gateway: DataGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            dashboard: Arc::new(RwLock::new(DashboardState::new())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sports", get(sports))
        .route("/api/games", get(games))
        .route("/api/slip", get(slip).delete(reset_slip))
        .route("/api/slip/legs", post(add_leg))
        .route("/api/slip/legs/:id", delete(remove_leg))
        .route("/api/slip/moneyline/:game_id", post(add_moneyline))
        .route("/api/suggest", post(suggest))
        .route("/api/analyze/:game_id", post(analyze))
        .route("/api/themes", get(themes))
        .route("/api/theme", put(select_theme))
        .route("/api/settings", get(settings).put(set_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
struct Sourced<T> {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<FallbackCause>,
    #[serde(flatten)]
    body: T,
}

impl<T> Sourced<T> {
    fn from_acquired<U>(acquired: &Acquired<U>, body: T) -> Self {
        Self {
            source: acquired.source(),
            cause: acquired.cause().cloned(),
            body,
        }
    }
}

#[derive(Serialize)]
struct SportEntry {
    id: &'static str,
    name: &'static str,
}

async fn sports() -> Json<Vec<SportEntry>> {
    Json(
        Sport::ALL
            .iter()
            .map(|s| SportEntry {
                id: s.id(),
                name: s.display_name(),
            })
            .collect(),
    )
}

#[derive(Deserialize)]
struct GamesQuery {
    sport: Option<String>,
}

#[derive(Serialize)]
struct GamesBody {
    sport: String,
    games: Vec<Game>,
}

async fn games(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<Sourced<GamesBody>>, ApiError> {
    let sport_id = match query.sport {
        Some(id) => id,
        None => state.dashboard.read().await.sport().id().to_string(),
    };
    let sport: Sport = sport_id.parse().map_err(ApiError::BadRequest)?;

    let acquired = state.gateway.list_upcoming_games(sport.id()).await;
    let games = acquired.value().clone();
    {
        let mut dashboard = state.dashboard.write().await;
        dashboard.select_sport(sport);
        dashboard.set_games(games.clone());
    }

    Ok(Json(Sourced::from_acquired(
        &acquired,
        GamesBody {
            sport: sport.id().to_string(),
            games,
        },
    )))
}

async fn slip(State(state): State<AppState>) -> Json<SlipSummary> {
    Json(state.dashboard.read().await.slip_summary())
}

async fn reset_slip(State(state): State<AppState>) -> Json<SlipSummary> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.reset_slip();
    Json(dashboard.slip_summary())
}

#[derive(Deserialize)]
struct LegRequest {
    id: String,
    label: String,
    odds: f64,
    confidence: f64,
}

#[derive(Serialize)]
struct LegChange {
    changed: bool,
    #[serde(flatten)]
    slip: SlipSummary,
}

async fn add_leg(
    State(state): State<AppState>,
    Json(request): Json<LegRequest>,
) -> Result<Json<LegChange>, ApiError> {
    let leg = ParlayLeg::new(request.id, request.label, request.odds, request.confidence)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut dashboard = state.dashboard.write().await;
    let changed = dashboard.add_leg(leg);
    Ok(Json(LegChange {
        changed,
        slip: dashboard.slip_summary(),
    }))
}

async fn add_moneyline(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<LegChange>, ApiError> {
    let mut dashboard = state.dashboard.write().await;
    let changed = dashboard
        .add_moneyline(&game_id)
        .ok_or_else(|| ApiError::NotFound(format!("game {} is not listed", game_id)))?
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(LegChange {
        changed,
        slip: dashboard.slip_summary(),
    }))
}

async fn remove_leg(State(state): State<AppState>, Path(id): Path<String>) -> Json<LegChange> {
    let mut dashboard = state.dashboard.write().await;
    let changed = dashboard.remove_leg(&id);
    Json(LegChange {
        changed,
        slip: dashboard.slip_summary(),
    })
}

async fn listed_game(state: &AppState, game_id: &str) -> Result<Game, ApiError> {
    state
        .dashboard
        .read()
        .await
        .game(game_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("game {} is not listed", game_id)))
}

#[derive(Deserialize)]
struct SuggestRequest {
    game_id: String,
    target_odds: Option<f64>,
}

#[derive(Serialize)]
struct SuggestBody {
    suggestion: SuggestionBundle,
    slip: SlipSummary,
}

async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<Sourced<SuggestBody>>, ApiError> {
    let game = listed_game(&state, &request.game_id).await?;
    if let Some(target) = request.target_odds {
        if !target.is_finite() || target < 1.0 {
            return Err(ApiError::BadRequest(format!(
                "target odds {} must be at least 1.0",
                target
            )));
        }
    }
    let target = {
        let mut dashboard = state.dashboard.write().await;
        if request.target_odds.is_some() {
            dashboard.set_target_odds(request.target_odds);
        }
        dashboard.target_odds()
    };

    // No lock is held while the provider call is in flight
    let acquired = state.gateway.generate_parlay_suggestion(&game, target).await;
    let suggestion = acquired.value().clone();

    let mut dashboard = state.dashboard.write().await;
    dashboard.apply_suggestion(&game.id, suggestion.clone());

    Ok(Json(Sourced::from_acquired(
        &acquired,
        SuggestBody {
            suggestion,
            slip: dashboard.slip_summary(),
        },
    )))
}

async fn analyze(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Sourced<GameAnalysisView>>, ApiError> {
    let game = listed_game(&state, &game_id).await?;
    let acquired = state.gateway.analyze_game(&game).await;

    let mut dashboard = state.dashboard.write().await;
    dashboard.set_analysis(&game.id, acquired.value().clone());
    let view = dashboard
        .analysis()
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("no analysis for game {}", game_id)))?;

    Ok(Json(Sourced::from_acquired(&acquired, view)))
}

async fn themes() -> Json<Vec<Theme>> {
    Json(theme_catalog())
}

#[derive(Deserialize)]
struct ThemeRequest {
    name: String,
}

async fn select_theme(
    State(state): State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> Result<Json<Theme>, ApiError> {
    let mut dashboard = state.dashboard.write().await;
    if !dashboard.select_theme(&request.name) {
        return Err(ApiError::NotFound(format!("unknown theme {}", request.name)));
    }
    Ok(Json(dashboard.theme().clone()))
}

#[derive(Serialize, Deserialize)]
struct Settings {
    open: bool,
}

async fn settings(State(state): State<AppState>) -> Json<Settings> {
    Json(Settings {
        open: state.dashboard.read().await.settings_open(),
    })
}

async fn set_settings(
    State(state): State<AppState>,
    Json(request): Json<Settings>,
) -> Json<Settings> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_settings_open(request.open);
    Json(Settings {
        open: dashboard.settings_open(),
    })
}
