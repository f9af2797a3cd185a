use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sgm_edge::data::{load_sport_games_from_cache, save_games_to_cache, save_slip_to_csv};
use sgm_edge::odds_api::OddsApiClient;
use sgm_edge::parlay::ParlaySlip;
use sgm_edge::{Acquired, Config, DataGateway, Game, ParlayLeg};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sgm-edge", about = "Same Game Multi builder")]
struct Cli {
    /// Odds provider key (overrides ODDS_API_KEY)
    #[arg(long, global = true)]
    odds_key: Option<String>,

    /// Language provider key (overrides GEMINI_API_KEY)
    #[arg(long, global = true)]
    gemini_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List upcoming games for a sport
    Games {
        #[arg(long, default_value = "nba")]
        sport: String,
        /// Save the listing as JSON
        #[arg(long)]
        save: Option<PathBuf>,
        /// Read a previously saved listing instead of calling the provider
        #[arg(long, conflicts_with = "save")]
        from: Option<PathBuf>,
    },
    /// Ask the model for a Same Game Multi on one game
    Suggest {
        #[arg(long, default_value = "nba")]
        sport: String,
        #[arg(long)]
        game: String,
        /// Target combined decimal odds
        #[arg(long)]
        target: Option<f64>,
    },
    /// Injury, venue and form analysis for one game
    Analyze {
        #[arg(long, default_value = "nba")]
        sport: String,
        #[arg(long)]
        game: String,
    },
    /// Combine legs given as label:odds:confidence
    Slip {
        #[arg(long = "leg", required = true)]
        legs: Vec<String>,
        /// Write the slip to CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Show the odds provider request quota
    Usage,
}

fn print_source<T>(acquired: &Acquired<T>) {
    match acquired.cause() {
        None => println!("(live data)\n"),
        Some(cause) => println!("(fallback data: {:?})\n", cause),
    }
}

async fn find_game(gateway: &DataGateway, sport: &str, game_id: &str) -> Result<Game> {
    let games = gateway.list_upcoming_games(sport).await.into_value();
    match games.into_iter().find(|g| g.id == game_id) {
        Some(game) => Ok(game),
        None => bail!("No {} game with id {}", sport, game_id),
    }
}

fn parse_leg(index: usize, raw: &str) -> Result<ParlayLeg> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(confidence), Some(odds), Some(label)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("Leg {:?} must look like label:odds:confidence", raw);
    };
    let odds: f64 = odds.trim().parse().context("Invalid odds")?;
    let confidence: f64 = confidence.trim().parse().context("Invalid confidence")?;

    Ok(ParlayLeg::new(
        format!("leg-{}", index + 1),
        label.trim(),
        odds,
        confidence,
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    sgm_edge::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to read configuration")?;
    if cli.odds_key.is_some() {
        config.odds_api_key = cli.odds_key.filter(|k| !k.is_empty());
    }
    if cli.gemini_key.is_some() {
        config.gemini_api_key = cli.gemini_key.filter(|k| !k.is_empty());
    }

    let gateway = DataGateway::from_config(&config).context("Failed to build gateway")?;

    match cli.command {
        Command::Games { sport, save, from } => {
            let games = match from {
                Some(path) => {
                    println!("Loading games from cache {}\n", path.display());
                    load_sport_games_from_cache(&path, &sport)?
                }
                None => {
                    let acquired = gateway.list_upcoming_games(&sport).await;
                    print_source(&acquired);
                    acquired.into_value()
                }
            };

            if games.is_empty() {
                println!("No upcoming {} games.", sport);
            }
            for game in &games {
                println!(
                    "[{}] {} | {} | {} | {:.2} / {:.2}",
                    game.id,
                    game.matchup(),
                    game.time_label,
                    game.venue,
                    game.moneyline.home,
                    game.moneyline.away
                );
            }

            if let Some(path) = save {
                save_games_to_cache(&games, &path)?;
                println!("\nSaved games to {}", path.display());
            }
        }
        Command::Suggest {
            sport,
            game,
            target,
        } => {
            let game = find_game(&gateway, &sport, &game).await?;
            let acquired = gateway.generate_parlay_suggestion(&game, target).await;
            print_source(&acquired);
            let bundle = acquired.into_value();

            println!("SAME GAME MULTI: {}\n", game.matchup());
            for (i, bet) in bundle.bets.iter().enumerate() {
                println!(
                    "{}. {} @ {:.2} ({:.0}%)",
                    i + 1,
                    bet.label(),
                    bet.odds,
                    bet.confidence
                );
                if !bet.rationale.is_empty() {
                    println!("   {}", bet.rationale);
                }
            }
            println!("\nTotal odds: {:.2}", bundle.total_odds);
            println!("Gravity score: {:.0}%", bundle.gravity_score);
            for warning in &bundle.correlation_warnings {
                println!("Warning: {}", warning);
            }
            if !bundle.rationale.is_empty() {
                println!("\n{}", bundle.rationale);
            }
        }
        Command::Analyze { sport, game } => {
            let game = find_game(&gateway, &sport, &game).await?;
            let acquired = gateway.analyze_game(&game).await;
            print_source(&acquired);
            let analysis = acquired.into_value();

            println!("ANALYSIS: {}\n", game.matchup());
            println!("Injuries:");
            for injury in &analysis.injuries {
                println!("  - {}", injury);
            }
            println!("Venue history: {}", analysis.venue_history);
            println!("Current form: {}", analysis.current_form);
            println!("Gravity score: {:.0}%", analysis.gravity_score);
        }
        Command::Slip { legs, export } => {
            let mut slip = ParlaySlip::new();
            for (i, raw) in legs.iter().enumerate() {
                slip.add_leg(parse_leg(i, raw)?);
            }

            let summary = slip.summary();
            for leg in &summary.legs {
                println!("{} @ {:.2} ({:.0}%)", leg.label(), leg.odds(), leg.confidence());
            }
            println!("\nCombined odds: {}", summary.combined_odds);
            println!("Combined confidence: {}%", summary.combined_confidence);

            if let Some(path) = export {
                save_slip_to_csv(slip.legs(), &path)?;
                println!("\nSaved slip to {}", path.display());
            }
        }
        Command::Usage => {
            let Some(key) = config.odds_api_key else {
                bail!("ODDS_API_KEY is not set");
            };
            let http = reqwest::Client::builder()
                .timeout(config.http_timeout)
                .build()
                .context("Failed to build HTTP client")?;
            let client = OddsApiClient::with_client(key, &config.odds_api_base_url, http);
            let quota = client.check_usage().await?;
            println!("API requests remaining: {:?}", quota.remaining);
            println!("API requests used: {:?}", quota.used);
        }
    }

    Ok(())
}
