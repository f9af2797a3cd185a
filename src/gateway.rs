//! Data acquisition with deterministic fallback.
//!
//! Every operation here is total: provider failures are logged and replaced with
//! the mock data in [`crate::utils::mock_data`], and the returned [`Acquired`]
//! records which path produced the value.

use crate::api::gemini_api::GeminiClient;
use crate::api::odds_api::OddsApiClient;
use crate::api::prompts::{analysis_prompt, parlay_prompt};
use crate::config::{Config, MAX_LOOKAHEAD_DAYS};
use crate::error::GatewayError;
use crate::models::{Game, GameAnalysis, Sport, SuggestionBundle};
use crate::utils::mock_data::{mock_analysis, mock_games, mock_suggestion};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_TARGET_ODDS: f64 = 5.0;

/// Why a fallback value was served instead of live data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackCause {
    MissingCredential,
    ProviderFailed(String),
}

/// Result of a gateway call: live provider data, or a fallback and the reason for it
#[derive(Debug, Clone, PartialEq)]
pub enum Acquired<T> {
    Live(T),
    Fallback { value: T, cause: FallbackCause },
}

impl<T> Acquired<T> {
    pub fn value(&self) -> &T {
        match self {
            Acquired::Live(value) | Acquired::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Acquired::Live(value) | Acquired::Fallback { value, .. } => value,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Acquired::Live(_))
    }

    pub fn cause(&self) -> Option<&FallbackCause> {
        match self {
            Acquired::Live(_) => None,
            Acquired::Fallback { cause, .. } => Some(cause),
        }
    }

    /// "live" or "fallback"
    pub fn source(&self) -> &'static str {
        if self.is_live() {
            "live"
        } else {
            "fallback"
        }
    }
}

pub struct DataGateway {
    odds: Option<OddsApiClient>,
    language: Option<GeminiClient>,
    mock_latency: Duration,
    lookahead: chrono::Duration,
}

impl DataGateway {
    /// Build provider clients for every configured credential.
    /// Fails only on an out-of-range lookahead or if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let lookahead = (0..=MAX_LOOKAHEAD_DAYS)
            .contains(&config.lookahead_days)
            .then(|| chrono::Duration::days(config.lookahead_days))
            .ok_or_else(|| {
                GatewayError::Config(format!(
                    "lookahead of {} days is outside 0..={}",
                    config.lookahead_days, MAX_LOOKAHEAD_DAYS
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| GatewayError::ClientBuild(e.to_string()))?;

        let odds = config.odds_api_key.clone().map(|key| {
            OddsApiClient::with_client(key, &config.odds_api_base_url, http.clone())
        });
        let language = config.gemini_api_key.clone().map(|key| {
            GeminiClient::with_client(
                key,
                &config.gemini_api_base_url,
                &config.gemini_model,
                config.retry,
                http.clone(),
            )
        });

        info!(
            "Gateway ready (odds provider: {}, language provider: {})",
            if odds.is_some() { "live" } else { "mock" },
            if language.is_some() { "live" } else { "mock" },
        );

        Ok(Self {
            odds,
            language,
            mock_latency: config.mock_latency,
            lookahead,
        })
    }

    /// Gateway that never touches the network
    pub fn offline(mock_latency: Duration) -> Self {
        Self {
            odds: None,
            language: None,
            mock_latency,
            lookahead: chrono::Duration::days(7),
        }
    }

    async fn simulate_latency(&self) {
        if !self.mock_latency.is_zero() {
            tokio::time::sleep(self.mock_latency).await;
        }
    }

    /// Upcoming games for a sport id. No retry at this layer.
    pub async fn list_upcoming_games(&self, sport_id: &str) -> Acquired<Vec<Game>> {
        let Some(client) = &self.odds else {
            self.simulate_latency().await;
            return Acquired::Fallback {
                value: mock_games(sport_id),
                cause: FallbackCause::MissingCredential,
            };
        };

        let result = match sport_id.parse::<Sport>() {
            Ok(sport) => client.fetch_games(sport, self.lookahead).await,
            Err(_) => Err(GatewayError::UnknownSport(sport_id.to_string())),
        };

        match result {
            Ok(games) => Acquired::Live(games),
            Err(e) => {
                warn!("Falling back to mock games for {}: {}", sport_id, e);
                Acquired::Fallback {
                    value: mock_games(sport_id),
                    cause: FallbackCause::ProviderFailed(e.to_string()),
                }
            }
        }
    }

    /// AI Same Game Multi aimed at `target_odds` (defaults to 5.0 when absent or invalid)
    pub async fn generate_parlay_suggestion(
        &self,
        game: &Game,
        target_odds: Option<f64>,
    ) -> Acquired<SuggestionBundle> {
        let Some(client) = &self.language else {
            self.simulate_latency().await;
            return Acquired::Fallback {
                value: mock_suggestion(game),
                cause: FallbackCause::MissingCredential,
            };
        };

        let target = target_odds
            .filter(|t| t.is_finite() && *t >= 1.0)
            .unwrap_or(DEFAULT_TARGET_ODDS);
        let prompt = parlay_prompt(game, target);

        let result = client
            .generate_json::<SuggestionBundle>(&prompt)
            .await
            .and_then(sanitize_bundle);

        match result {
            Ok(bundle) => Acquired::Live(bundle),
            Err(e) => {
                warn!("Falling back to mock suggestion for game {}: {}", game.id, e);
                Acquired::Fallback {
                    value: mock_suggestion(game),
                    cause: FallbackCause::ProviderFailed(e.to_string()),
                }
            }
        }
    }

    /// Injury, venue and form analysis for a game
    pub async fn analyze_game(&self, game: &Game) -> Acquired<GameAnalysis> {
        let Some(client) = &self.language else {
            self.simulate_latency().await;
            return Acquired::Fallback {
                value: mock_analysis(game),
                cause: FallbackCause::MissingCredential,
            };
        };

        let result = client
            .generate_json::<GameAnalysis>(&analysis_prompt(game))
            .await
            .and_then(sanitize_analysis);

        match result {
            Ok(analysis) => Acquired::Live(analysis),
            Err(e) => {
                warn!("Falling back to mock analysis for game {}: {}", game.id, e);
                Acquired::Fallback {
                    value: mock_analysis(game),
                    cause: FallbackCause::ProviderFailed(e.to_string()),
                }
            }
        }
    }
}

fn clamp_score(score: f64) -> Result<f64, GatewayError> {
    if score.is_finite() {
        Ok(score.clamp(0.0, 100.0))
    } else {
        Err(GatewayError::MalformedPayload(format!("score {} is not a number", score)))
    }
}

/// Drop unusable bets and clamp scores. A bundle with nothing left is malformed.
fn sanitize_bundle(mut bundle: SuggestionBundle) -> Result<SuggestionBundle, GatewayError> {
    bundle.bets.retain(|bet| bet.odds.is_finite() && bet.odds >= 1.0);
    if bundle.bets.is_empty() {
        return Err(GatewayError::MalformedPayload("bundle has no usable bets".into()));
    }
    if !bundle.total_odds.is_finite() || bundle.total_odds < 1.0 {
        return Err(GatewayError::MalformedPayload(format!(
            "total odds {} below 1.0",
            bundle.total_odds
        )));
    }
    for bet in &mut bundle.bets {
        bet.confidence = clamp_score(bet.confidence)?;
    }
    bundle.gravity_score = clamp_score(bundle.gravity_score)?;
    Ok(bundle)
}

fn sanitize_analysis(mut analysis: GameAnalysis) -> Result<GameAnalysis, GatewayError> {
    analysis.gravity_score = clamp_score(analysis.gravity_score)?;
    Ok(analysis)
}
