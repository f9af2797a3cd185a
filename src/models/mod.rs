use crate::error::LegError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sports the dashboard knows how to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Nfl,
    Epl,
    Mlb,
    LaLiga,
}

impl Sport {
    pub const ALL: [Sport; 5] = [Sport::Nba, Sport::Nfl, Sport::Epl, Sport::Mlb, Sport::LaLiga];

    pub fn id(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Nfl => "nfl",
            Sport::Epl => "epl",
            Sport::Mlb => "mlb",
            Sport::LaLiga => "laliga",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Epl => "Premier League",
            Sport::Mlb => "MLB",
            Sport::LaLiga => "La Liga",
        }
    }

    /// Sport key used in The Odds API URL path
    pub fn odds_api_key(&self) -> &'static str {
        match self {
            Sport::Nba => "basketball_nba",
            Sport::Nfl => "americanfootball_nfl",
            Sport::Epl => "soccer_epl",
            Sport::Mlb => "baseball_mlb",
            Sport::LaLiga => "soccer_spain_la_liga",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sport id: {}", s))
    }
}

/// Two-outcome moneyline in decimal odds, home first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moneyline {
    pub home: f64,
    pub away: f64,
}

impl Moneyline {
    /// Used when the provider lists a game without a head-to-head price
    pub const NEUTRAL: Moneyline = Moneyline {
        home: 1.90,
        away: 1.90,
    };
}

/// An upcoming game. Replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub moneyline: Moneyline,
    /// Exact start time when the provider supplied one
    pub commence_time: Option<DateTime<Utc>>,
    /// Human readable schedule line ("SUN 8:00PM", "LIVE IN 2H")
    pub time_label: String,
    pub venue: String,
}

impl Game {
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetCategory {
    PlayerPoints,
    PlayerRebounds,
    PlayerAssists,
    TeamTotal,
    Spread,
    Moneyline,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Over,
    Under,
    Home,
    Away,
    #[serde(other)]
    Other,
}

/// One leg of an AI generated Same Game Multi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedBet {
    pub category: BetCategory,
    #[serde(default)]
    pub player: Option<String>,
    pub team: String,
    #[serde(default)]
    pub line: Option<f64>,
    pub selection: Selection,
    pub odds: f64,
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
}

impl SuggestedBet {
    pub fn label(&self) -> String {
        let subject = self.player.as_deref().unwrap_or(&self.team);
        let side = match self.selection {
            Selection::Over => "Over",
            Selection::Under => "Under",
            Selection::Home => "Home",
            Selection::Away => "Away",
            Selection::Other => "",
        };
        let market = match self.category {
            BetCategory::PlayerPoints => "Points",
            BetCategory::PlayerRebounds => "Rebounds",
            BetCategory::PlayerAssists => "Assists",
            BetCategory::TeamTotal => "Team Total",
            BetCategory::Spread => "Spread",
            BetCategory::Moneyline => "Moneyline",
            BetCategory::Other => "Special",
        };

        let mut parts = vec![subject.to_string()];
        if !side.is_empty() {
            parts.push(side.to_string());
        }
        if let Some(line) = self.line {
            parts.push(format!("{}", line));
        }
        parts.push(market.to_string());
        parts.join(" ")
    }
}

/// Structured result of a parlay suggestion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBundle {
    pub bets: Vec<SuggestedBet>,
    pub total_odds: f64,
    pub gravity_score: f64,
    #[serde(default)]
    pub correlation_warnings: Vec<String>,
    #[serde(default)]
    pub rationale: String,
}

impl SuggestionBundle {
    /// Converts every suggested bet into a slip leg keyed by the game id
    pub fn to_legs(&self, game_id: &str) -> Vec<ParlayLeg> {
        self.bets
            .iter()
            .enumerate()
            .filter_map(|(index, bet)| {
                ParlayLeg::new(
                    format!("{}-sgm-{}", game_id, index),
                    bet.label(),
                    bet.odds,
                    bet.confidence,
                )
                .ok()
            })
            .collect()
    }
}

/// Grounded pre-game analysis for a single matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub injuries: Vec<String>,
    pub venue_history: String,
    pub current_form: String,
    /// Home-side confidence percentage
    pub gravity_score: f64,
}

/// Longest decimal price a single leg may carry
pub const MAX_DECIMAL_ODDS: f64 = 1000.0;

/// A single selection on the bet slip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParlayLeg {
    id: String,
    label: String,
    odds: f64,
    confidence: f64,
}

impl ParlayLeg {
    /// Builds a leg, rejecting odds outside [1.0, MAX_DECIMAL_ODDS] (or non-finite)
    /// and confidence outside [0, 100]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        odds: f64,
        confidence: f64,
    ) -> Result<Self, LegError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LegError::EmptyId);
        }
        if !odds.is_finite() || odds < 1.0 {
            return Err(LegError::InvalidOdds(odds));
        }
        if odds > MAX_DECIMAL_ODDS {
            return Err(LegError::OddsTooLong(odds));
        }
        if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
            return Err(LegError::InvalidConfidence(confidence));
        }

        Ok(Self {
            id,
            label: label.into(),
            odds,
            confidence,
        })
    }

    /// Home moneyline leg for a listed game. Confidence is the implied probability of the price.
    pub fn home_moneyline(game: &Game) -> Result<Self, LegError> {
        let odds = game.moneyline.home;
        let confidence = if odds.is_finite() && odds >= 1.0 {
            (100.0 / odds).round().clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self::new(
            game.id.clone(),
            format!("{} Moneyline", game.home_team),
            odds,
            confidence,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn odds(&self) -> f64 {
        self.odds
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Team colors used by the dashboard. Carried as plain data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary: String,
    pub secondary: String,
    /// Sport id, or "all" for the default theme
    pub sport: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> Game {
        Game {
            id: "1".to_string(),
            sport: "nba".to_string(),
            home_team: "LA Lakers".to_string(),
            away_team: "GS Warriors".to_string(),
            moneyline: Moneyline {
                home: 1.85,
                away: 2.05,
            },
            commence_time: None,
            time_label: "LIVE IN 2H".to_string(),
            venue: "CRYPTO.COM ARENA".to_string(),
        }
    }

    #[test]
    fn test_sport_parsing() {
        assert_eq!("nba".parse::<Sport>().unwrap(), Sport::Nba);
        assert_eq!("LaLiga".parse::<Sport>().unwrap(), Sport::LaLiga);
        assert!("curling".parse::<Sport>().is_err());
        assert_eq!(Sport::Epl.odds_api_key(), "soccer_epl");
    }

    #[test]
    fn test_leg_validation() {
        assert!(ParlayLeg::new("a", "A", 1.0, 0.0).is_ok());
        assert!(ParlayLeg::new("a", "A", 1.5, 100.0).is_ok());
        assert!(matches!(
            ParlayLeg::new("a", "A", 0.95, 50.0),
            Err(LegError::InvalidOdds(_))
        ));
        assert!(matches!(
            ParlayLeg::new("a", "A", f64::NAN, 50.0),
            Err(LegError::InvalidOdds(_))
        ));
        assert!(ParlayLeg::new("a", "A", MAX_DECIMAL_ODDS, 50.0).is_ok());
        assert!(matches!(
            ParlayLeg::new("a", "A", 1e200, 50.0),
            Err(LegError::OddsTooLong(_))
        ));
        assert!(matches!(
            ParlayLeg::new("a", "A", 2.0, 101.0),
            Err(LegError::InvalidConfidence(_))
        ));
        assert!(matches!(
            ParlayLeg::new("  ", "A", 2.0, 50.0),
            Err(LegError::EmptyId)
        ));
    }

    #[test]
    fn test_home_moneyline_leg() {
        let leg = ParlayLeg::home_moneyline(&sample_game()).unwrap();
        assert_eq!(leg.id(), "1");
        assert_eq!(leg.label(), "LA Lakers Moneyline");
        assert_eq!(leg.odds(), 1.85);
        // 100 / 1.85 = 54.05
        assert_eq!(leg.confidence(), 54.0);
    }

    #[test]
    fn test_bundle_to_legs_skips_invalid_bets() {
        let bundle = SuggestionBundle {
            bets: vec![
                SuggestedBet {
                    category: BetCategory::PlayerPoints,
                    player: Some("LeBron James".to_string()),
                    team: "LA Lakers".to_string(),
                    line: Some(25.5),
                    selection: Selection::Over,
                    odds: 1.87,
                    confidence: 72.0,
                    rationale: String::new(),
                },
                SuggestedBet {
                    category: BetCategory::Moneyline,
                    player: None,
                    team: "LA Lakers".to_string(),
                    line: None,
                    selection: Selection::Home,
                    odds: 0.5,
                    confidence: 60.0,
                    rationale: String::new(),
                },
            ],
            total_odds: 1.87,
            gravity_score: 72.0,
            correlation_warnings: vec![],
            rationale: String::new(),
        };

        let legs = bundle.to_legs("1");
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].id(), "1-sgm-0");
        assert_eq!(legs[0].label(), "LeBron James Over 25.5 Points");
    }

    #[test]
    fn test_unknown_category_deserializes_as_other() {
        let bet: SuggestedBet = serde_json::from_str(
            r#"{"category":"first_basket","team":"Celtics","selection":"over","odds":4.5,"confidence":20}"#,
        )
        .unwrap();
        assert_eq!(bet.category, BetCategory::Other);
        assert_eq!(bet.player, None);
    }
}
