use crate::models::{Game, ParlayLeg};
use anyhow::{Context, Result};
use std::path::Path;

/// Save a game listing to a JSON file
pub fn save_games_to_cache(games: &[Game], cache_file: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(games).context("Failed to serialize games")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load a game listing from a JSON file
pub fn load_games_from_cache(cache_file: impl AsRef<Path>) -> Result<Vec<Game>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let games: Vec<Game> = serde_json::from_str(&json).context("Failed to deserialize games")?;
    Ok(games)
}

/// Load a saved listing, keeping only one sport's games
pub fn load_sport_games_from_cache(
    cache_file: impl AsRef<Path>,
    sport_id: &str,
) -> Result<Vec<Game>> {
    let games = load_games_from_cache(cache_file)?;
    Ok(games.into_iter().filter(|g| g.sport == sport_id).collect())
}

/// Save the bet slip to CSV
pub fn save_slip_to_csv(legs: &[ParlayLeg], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record(["id", "label", "odds", "confidence"])?;
    for leg in legs {
        writer.write_record([
            leg.id().to_string(),
            leg.label().to_string(),
            format!("{:.2}", leg.odds()),
            format!("{:.0}", leg.confidence()),
        ])?;
    }
    writer.flush().context("Failed to flush CSV file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mock_data::mock_games;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sgm_edge_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_games_cache_round_trip() {
        let path = temp_path("games.json");
        let games = mock_games("nba");

        save_games_to_cache(&games, &path).unwrap();
        assert_eq!(load_games_from_cache(&path).unwrap(), games);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_one_sport_from_mixed_cache() {
        let path = temp_path("mixed.json");
        let mut games = mock_games("nba");
        games.extend(mock_games("epl"));

        save_games_to_cache(&games, &path).unwrap();
        let epl = load_sport_games_from_cache(&path, "epl").unwrap();
        assert_eq!(epl, mock_games("epl"));
        assert!(load_sport_games_from_cache(&path, "mlb").unwrap().is_empty());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_slip_csv() {
        let path = temp_path("slip.csv");
        let legs = vec![
            ParlayLeg::new("1", "LA Lakers Moneyline", 1.85, 54.0).unwrap(),
            ParlayLeg::new("2", "Over, 220.5", 1.91, 75.0).unwrap(),
        ];

        save_slip_to_csv(&legs, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "id,label,odds,confidence\n1,LA Lakers Moneyline,1.85,54\n2,\"Over, 220.5\",1.91,75\n"
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load_games_from_cache(temp_path("does_not_exist.json")).is_err());
    }
}
