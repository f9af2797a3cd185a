use crate::error::LegError;
use crate::models::{Game, GameAnalysis, ParlayLeg, Sport, SuggestionBundle, Theme};
use crate::utils::parlay::{ParlaySlip, SlipSummary};
use serde::Serialize;

fn theme(name: &str, primary: &str, secondary: &str, sport: &str) -> Theme {
    Theme {
        name: name.to_string(),
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        sport: sport.to_string(),
    }
}

/// Default theme first, then per-team themes
pub fn theme_catalog() -> Vec<Theme> {
    vec![
        theme("Antigravity Default", "#00F2FF", "#FF3131", "all"),
        theme("LA Lakers", "#552583", "#FDB927", "nba"),
        theme("Boston Celtics", "#007A33", "#BA9653", "nba"),
        theme("GS Warriors", "#1D428A", "#FFC72C", "nba"),
        theme("Dallas Cowboys", "#003594", "#869397", "nfl"),
        theme("KC Chiefs", "#E31837", "#FFB81C", "nfl"),
        theme("Man City", "#6CABDD", "#FFFFFF", "epl"),
        theme("Arsenal", "#EF0107", "#FFFFFF", "epl"),
        theme("Real Madrid", "#FEBE10", "#00529F", "laliga"),
        theme("NY Yankees", "#003087", "#E31837", "mlb"),
    ]
}

/// Analysis together with the game it was produced for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysisView {
    pub game_id: String,
    #[serde(flatten)]
    pub analysis: GameAnalysis,
}

/// Everything the dashboard shows. Each field has one update method.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    sport: Sport,
    theme: Theme,
    games: Vec<Game>,
    slip: ParlaySlip,
    target_odds: Option<f64>,
    suggestion: Option<SuggestionBundle>,
    analysis: Option<GameAnalysisView>,
    settings_open: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            sport: Sport::Nba,
            theme: theme_catalog().remove(0),
            games: Vec::new(),
            slip: ParlaySlip::new(),
            target_odds: None,
            suggestion: None,
            analysis: None,
            settings_open: false,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn slip(&self) -> &ParlaySlip {
        &self.slip
    }

    pub fn target_odds(&self) -> Option<f64> {
        self.target_odds
    }

    pub fn suggestion(&self) -> Option<&SuggestionBundle> {
        self.suggestion.as_ref()
    }

    pub fn analysis(&self) -> Option<&GameAnalysisView> {
        self.analysis.as_ref()
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Switching sport clears the listing and any analysis of the old games
    pub fn select_sport(&mut self, sport: Sport) {
        if self.sport != sport {
            self.sport = sport;
            self.games.clear();
            self.analysis = None;
        }
    }

    /// Returns false when no theme has that name
    pub fn select_theme(&mut self, name: &str) -> bool {
        match theme_catalog().into_iter().find(|t| t.name == name) {
            Some(theme) => {
                self.theme = theme;
                true
            }
            None => false,
        }
    }

    /// Replace the game listing wholesale
    pub fn set_games(&mut self, games: Vec<Game>) {
        self.games = games;
    }

    /// Target multiplier for the next suggestion. Values below 1.0 clear it.
    pub fn set_target_odds(&mut self, target: Option<f64>) {
        self.target_odds = target.filter(|t| t.is_finite() && *t >= 1.0);
    }

    pub fn add_leg(&mut self, leg: ParlayLeg) -> bool {
        self.slip.add_leg(leg)
    }

    /// Add the home moneyline of a listed game
    pub fn add_moneyline(&mut self, game_id: &str) -> Option<Result<bool, LegError>> {
        let leg = ParlayLeg::home_moneyline(self.game(game_id)?);
        Some(leg.map(|leg| self.slip.add_leg(leg)))
    }

    pub fn remove_leg(&mut self, id: &str) -> bool {
        self.slip.remove_leg(id)
    }

    pub fn reset_slip(&mut self) {
        self.slip.clear();
    }

    /// Store a suggestion and replace the slip with its legs
    pub fn apply_suggestion(&mut self, game_id: &str, bundle: SuggestionBundle) {
        self.slip.replace(bundle.to_legs(game_id));
        self.suggestion = Some(bundle);
    }

    pub fn set_analysis(&mut self, game_id: &str, analysis: GameAnalysis) {
        self.analysis = Some(GameAnalysisView {
            game_id: game_id.to_string(),
            analysis,
        });
    }

    pub fn set_settings_open(&mut self, open: bool) {
        self.settings_open = open;
    }

    pub fn slip_summary(&self) -> SlipSummary {
        self.slip.summary()
    }
}
