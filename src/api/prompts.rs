use crate::models::Game;

fn schedule(game: &Game) -> String {
    match game.commence_time {
        Some(start) => format!("{} ({})", game.time_label, start.to_rfc3339()),
        None => game.time_label.clone(),
    }
}

/// Prompt asking for a Same Game Multi near `target_odds`
pub fn parlay_prompt(game: &Game, target_odds: f64) -> String {
    format!(
        r#"Build a Same Game Multi for {home} vs {away} at {venue}, scheduled {schedule}.
Current moneyline: {home} {home_odds:.2}, {away} {away_odds:.2}.
Target combined decimal odds: {target:.2}.
Use real-time injury news, venue history and recent form. Every leg must come from this game.
Respond ONLY as a JSON object:
{{ "bets": [{{ "category": "player_points|player_rebounds|player_assists|team_total|spread|moneyline", "player": "string or null", "team": "string", "line": number or null, "selection": "over|under|home|away", "odds": number, "confidence": number, "rationale": "string" }}],
  "total_odds": number, "gravity_score": number, "correlation_warnings": ["string"], "rationale": "string" }}"#,
        home = game.home_team,
        away = game.away_team,
        venue = game.venue,
        schedule = schedule(game),
        home_odds = game.moneyline.home,
        away_odds = game.moneyline.away,
        target = target_odds,
    )
}

/// Prompt asking for injuries, venue history and form for a matchup
pub fn analysis_prompt(game: &Game) -> String {
    format!(
        r#"Analyze the sports game: {home} vs {away} at {venue}, scheduled {schedule}.
Find real-time:
1. Injury list (active/out/GTD).
2. Arena/matchup history at {venue}.
3. Current form (last 5 games).
Calculate a percentage "gravity_score" (confidence score) for a {home} win.
Respond ONLY as a JSON object: {{ "injuries": ["string"], "venue_history": "string", "current_form": "string", "gravity_score": number }}"#,
        home = game.home_team,
        away = game.away_team,
        venue = game.venue,
        schedule = schedule(game),
    )
}
