//! Fixed data served when a provider has no credential or cannot be reached.

use crate::models::{
    BetCategory, Game, GameAnalysis, Moneyline, Selection, SuggestedBet, SuggestionBundle, Sport,
};

struct MockGame {
    id: &'static str,
    home: &'static str,
    away: &'static str,
    odds: (f64, f64),
    time: &'static str,
    venue: &'static str,
}

impl MockGame {
    fn into_game(self, sport: Sport) -> Game {
        Game {
            id: self.id.to_string(),
            sport: sport.id().to_string(),
            home_team: self.home.to_string(),
            away_team: self.away.to_string(),
            moneyline: Moneyline {
                home: self.odds.0,
                away: self.odds.1,
            },
            commence_time: None,
            time_label: self.time.to_string(),
            venue: self.venue.to_string(),
        }
    }
}

/// Mock listing for a sport id. Unknown ids get an empty list.
pub fn mock_games(sport_id: &str) -> Vec<Game> {
    let Ok(sport) = sport_id.parse::<Sport>() else {
        return Vec::new();
    };

    let games = match sport {
        Sport::Nba => vec![
            MockGame {
                id: "1",
                home: "LA Lakers",
                away: "GS Warriors",
                odds: (1.85, 2.05),
                time: "LIVE IN 2H",
                venue: "CRYPTO.COM ARENA",
            },
            MockGame {
                id: "2",
                home: "Boston Celtics",
                away: "Miami Heat",
                odds: (1.45, 2.85),
                time: "LIVE IN 5H",
                venue: "TD GARDEN",
            },
        ],
        Sport::Nfl => vec![MockGame {
            id: "3",
            home: "Dallas Cowboys",
            away: "NY Giants",
            odds: (1.35, 3.40),
            time: "SUN 8:00PM",
            venue: "AT&T STADIUM",
        }],
        Sport::Epl => vec![MockGame {
            id: "4",
            home: "Man City",
            away: "Arsenal",
            odds: (1.95, 3.80),
            time: "SAT 12:30PM",
            venue: "ETIHAD STADIUM",
        }],
        Sport::Mlb | Sport::LaLiga => Vec::new(),
    };

    games.into_iter().map(|g| g.into_game(sport)).collect()
}

/// Canned three-leg multi. Independent of the target so the fallback stays deterministic.
pub fn mock_suggestion(game: &Game) -> SuggestionBundle {
    let bets = vec![
        SuggestedBet {
            category: BetCategory::Moneyline,
            player: None,
            team: game.home_team.clone(),
            line: None,
            selection: Selection::Home,
            odds: 1.85,
            confidence: 82.0,
            rationale: format!("{} are strong at {}.", game.home_team, game.venue),
        },
        SuggestedBet {
            category: BetCategory::TeamTotal,
            player: None,
            team: game.home_team.clone(),
            line: Some(220.5),
            selection: Selection::Over,
            odds: 1.91,
            confidence: 75.0,
            rationale: "Both sides have been trending over the total.".to_string(),
        },
        SuggestedBet {
            category: BetCategory::Spread,
            player: None,
            team: game.away_team.clone(),
            line: Some(8.5),
            selection: Selection::Away,
            odds: 1.45,
            confidence: 91.0,
            rationale: format!("{} have kept recent games close.", game.away_team),
        },
    ];
    let total_odds = bets.iter().map(|b| b.odds).product();

    SuggestionBundle {
        bets,
        total_odds,
        gravity_score: 83.0,
        correlation_warnings: vec![
            "Home moneyline and away spread partially offset each other.".to_string(),
        ],
        rationale: "Offline suggestion: no live model response was available.".to_string(),
    }
}

pub fn mock_analysis(game: &Game) -> GameAnalysis {
    GameAnalysis {
        injuries: vec![
            format!("{} starters (Active)", game.home_team),
            format!("{} starters (Active)", game.away_team),
        ],
        venue_history: format!(
            "{} have won 65% of recent head-to-head matchups at {}.",
            game.home_team, game.venue
        ),
        current_form: format!(
            "{} are 4-1 in their last 5 games; {} are 3-2.",
            game.away_team, game.home_team
        ),
        gravity_score: 78.0,
    }
}
