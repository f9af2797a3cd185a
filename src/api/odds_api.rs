use crate::config::DEFAULT_ODDS_API_BASE_URL;
use crate::error::GatewayError;
use crate::models::{Game, Moneyline, Sport};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PROVIDER: &str = "Odds API";
const UNKNOWN_VENUE: &str = "VENUE TBA";

/// Response from The Odds API for a single game
#[derive(Debug, Deserialize)]
pub(crate) struct OddsApiGame {
    id: String,
    commence_time: DateTime<Utc>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsApiBookmaker>,
}

/// Bookmaker data from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiBookmaker {
    #[serde(default)]
    markets: Vec<OddsApiMarket>,
}

/// Market data (e.g., moneyline, spread) from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsApiOutcome>,
}

/// Outcome data for a specific team
#[derive(Debug, Deserialize)]
struct OddsApiOutcome {
    name: String,
    price: f64,
}

/// Request quota reported in the response headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub remaining: Option<u32>,
    pub used: Option<u32>,
}

pub struct OddsApiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, DEFAULT_ODDS_API_BASE_URL, reqwest::Client::new())
    }

    pub fn with_client(api_key: String, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Fetch upcoming games with decimal moneyline odds for a sport.
    /// Only returns games starting between now and `lookahead` from now.
    pub async fn fetch_games(
        &self,
        sport: Sport,
        lookahead: Duration,
    ) -> Result<Vec<Game>, GatewayError> {
        let url = format!("{}/sports/{}/odds", self.base_url, sport.odds_api_key());
        debug!("Requesting {} odds from {}", sport, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h"), // h2h = head-to-head (moneyline)
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status {
                provider: PROVIDER,
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let api_games: Vec<OddsApiGame> = serde_json::from_str(&body)?;
        let games = normalize_games(api_games, sport, Utc::now(), lookahead);
        info!("Odds API returned {} upcoming {} games", games.len(), sport);

        Ok(games)
    }

    /// Check how many API requests you have remaining
    pub async fn check_usage(&self) -> Result<QuotaInfo, GatewayError> {
        let url = format!("{}/sports", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status {
                provider: PROVIDER,
                status: response.status(),
            });
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Ok(QuotaInfo {
            remaining: header("x-requests-remaining"),
            used: header("x-requests-used"),
        })
    }
}

/// Keep games inside `[now, now + lookahead]` and flatten them into `Game` records.
/// A window end past the representable range leaves the window open.
pub(crate) fn normalize_games(
    api_games: Vec<OddsApiGame>,
    sport: Sport,
    now: DateTime<Utc>,
    lookahead: Duration,
) -> Vec<Game> {
    let window_end = now.checked_add_signed(lookahead);

    api_games
        .into_iter()
        .filter(|api_game| {
            api_game.commence_time >= now
                && window_end.map_or(true, |end| api_game.commence_time <= end)
        })
        .map(|api_game| {
            let moneyline = first_moneyline(&api_game).unwrap_or(Moneyline::NEUTRAL);
            Game {
                time_label: api_game
                    .commence_time
                    .format("%a %-I:%M%p")
                    .to_string()
                    .to_uppercase(),
                commence_time: Some(api_game.commence_time),
                id: api_game.id,
                sport: sport.id().to_string(),
                home_team: api_game.home_team,
                away_team: api_game.away_team,
                moneyline,
                venue: UNKNOWN_VENUE.to_string(),
            }
        })
        .collect()
}

/// First bookmaker whose h2h market prices both teams
fn first_moneyline(api_game: &OddsApiGame) -> Option<Moneyline> {
    api_game.bookmakers.iter().find_map(|bookmaker| {
        let market = bookmaker.markets.iter().find(|m| m.key == "h2h")?;
        let price_of = |team: &str| {
            market
                .outcomes
                .iter()
                .find(|o| o.name == team)
                .map(|o| o.price)
                .filter(|p| p.is_finite() && *p >= 1.0)
        };

        Some(Moneyline {
            home: price_of(&api_game.home_team)?,
            away: price_of(&api_game.away_team)?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::HeaderMap, response::IntoResponse, routing::get, Json, Router};
    use std::collections::HashMap;

    fn raw_games(now: DateTime<Utc>) -> Vec<OddsApiGame> {
        let json = serde_json::json!([
            {
                "id": "in-window",
                "commence_time": (now + Duration::days(2)).to_rfc3339(),
                "home_team": "LA Lakers",
                "away_team": "GS Warriors",
                "bookmakers": [
                    { "markets": [ { "key": "spreads", "outcomes": [] } ] },
                    { "markets": [ { "key": "h2h", "outcomes": [
                        { "name": "GS Warriors", "price": 2.05 },
                        { "name": "LA Lakers", "price": 1.85 }
                    ] } ] }
                ]
            },
            {
                "id": "no-prices",
                "commence_time": (now + Duration::hours(3)).to_rfc3339(),
                "home_team": "Boston Celtics",
                "away_team": "Miami Heat",
                "bookmakers": []
            },
            {
                "id": "already-started",
                "commence_time": (now - Duration::hours(1)).to_rfc3339(),
                "home_team": "A",
                "away_team": "B",
                "bookmakers": []
            },
            {
                "id": "too-far",
                "commence_time": (now + Duration::days(8)).to_rfc3339(),
                "home_team": "C",
                "away_team": "D",
                "bookmakers": []
            }
        ]);
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalize_filters_window_and_extracts_prices() {
        let now = Utc::now();
        let games = normalize_games(raw_games(now), Sport::Nba, now, Duration::days(7));

        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["in-window", "no-prices"]);

        // Home price comes first even though the provider listed the away team first
        assert_eq!(
            games[0].moneyline,
            Moneyline {
                home: 1.85,
                away: 2.05
            }
        );
        assert_eq!(games[1].moneyline, Moneyline::NEUTRAL);
        assert_eq!(games[0].sport, "nba");
        assert!(games[0].commence_time.is_some());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let now = Utc::now();
        let json = serde_json::json!([
            { "id": "start", "commence_time": now.to_rfc3339(), "home_team": "A", "away_team": "B" },
            { "id": "end", "commence_time": (now + Duration::days(7)).to_rfc3339(), "home_team": "C", "away_team": "D" }
        ]);
        let raw: Vec<OddsApiGame> = serde_json::from_value(json).unwrap();
        let games = normalize_games(raw, Sport::Nfl, now, Duration::days(7));
        assert_eq!(games.len(), 2);
    }

    #[test]
    fn test_unrepresentable_window_end_is_open() {
        let now = Utc::now();
        let games = normalize_games(raw_games(now), Sport::Nba, now, Duration::MAX);

        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["in-window", "no-prices", "too-far"]);
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_games_against_local_provider() {
        let app = Router::new().route(
            "/sports/basketball_nba/odds",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("apiKey").map(String::as_str), Some("secret"));
                assert_eq!(params.get("oddsFormat").map(String::as_str), Some("decimal"));
                let start = (Utc::now() + Duration::hours(4)).to_rfc3339();
                Json(serde_json::json!([
                    { "id": "g1", "commence_time": start, "home_team": "LA Lakers", "away_team": "GS Warriors" }
                ]))
            }),
        );
        let base_url = spawn(app).await;

        let client = OddsApiClient::with_client("secret".into(), &base_url, reqwest::Client::new());
        let games = client.fetch_games(Sport::Nba, Duration::days(7)).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "LA Lakers");
    }

    #[tokio::test]
    async fn test_fetch_games_reports_status() {
        let app = Router::new().route(
            "/sports/soccer_epl/odds",
            get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
        );
        let base_url = spawn(app).await;

        let client = OddsApiClient::with_client("bad".into(), &base_url, reqwest::Client::new());
        let err = client.fetch_games(Sport::Epl, Duration::days(7)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_check_usage_reads_headers() {
        let app = Router::new().route(
            "/sports",
            get(|| async {
                let mut headers = HeaderMap::new();
                headers.insert("x-requests-remaining", "480".parse().unwrap());
                headers.insert("x-requests-used", "20".parse().unwrap());
                (headers, Json(serde_json::json!([]))).into_response()
            }),
        );
        let base_url = spawn(app).await;

        let client = OddsApiClient::with_client("k".into(), &base_url, reqwest::Client::new());
        let quota = client.check_usage().await.unwrap();
        assert_eq!(
            quota,
            QuotaInfo {
                remaining: Some(480),
                used: Some(20)
            }
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_games_live() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("ODDS_API_KEY").expect("ODDS_API_KEY not set");
        let client = OddsApiClient::new(api_key);

        let games = client.fetch_games(Sport::Nba, Duration::days(7)).await.unwrap();
        assert!(games.iter().all(|g| g.moneyline.home >= 1.0));
    }
}
