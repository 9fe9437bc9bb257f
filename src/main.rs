use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tournament_tracker::config::AppConfig;
use tournament_tracker::models::{Player, Standing, Tournament, TournamentId};
use tournament_tracker::storage::{StorageConfig, TournamentStore};
use tournament_tracker::{parse_duration, StandardPairingGenerator};

#[derive(Parser)]
#[command(name = "tournament-tracker")]
#[command(about = "Swiss and random pairings with round-by-round standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament
    Create {
        /// Tournament name
        #[arg(long)]
        name: String,

        /// Number of rounds
        #[arg(long, default_value = "3")]
        rounds: u32,

        /// Player names (repeat the flag or separate with commas)
        #[arg(long = "player", value_delimiter = ',', required = true)]
        players: Vec<String>,
    },

    /// List stored tournaments
    List,

    /// Show every round of a tournament
    Show { id: String },

    /// Generate pairings for a round and store them
    Pair {
        id: String,

        /// Round number (default: first round without pairings)
        #[arg(long)]
        round: Option<usize>,

        /// Pair at random instead of by standings
        #[arg(long)]
        random: bool,

        /// Swiss search budget (e.g., "5s", "500ms")
        #[arg(long)]
        timeout: Option<String>,

        /// Replace pairings already stored for the round
        #[arg(long)]
        force: bool,

        /// Print the pairings without storing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Record the result of one table
    Score {
        id: String,

        /// Round number
        #[arg(long)]
        round: usize,

        /// Table number within the round
        #[arg(long)]
        table: usize,

        /// Score of the first player
        first: i32,

        /// Score of the second player
        second: i32,
    },

    /// Swap two players between their tables
    Swap {
        id: String,

        /// Round number
        #[arg(long)]
        round: usize,

        first: String,

        second: String,
    },

    /// Print standings
    Standings {
        id: String,

        /// Only this round's results
        #[arg(long)]
        round: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored tournament
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting tournament-tracker v{}", env!("CARGO_PKG_VERSION"));

    let generator = Arc::new(StandardPairingGenerator::from_config(&config.pairing));
    let store = TournamentStore::new(StorageConfig::new(config.data_dir.clone()))
        .with_generator(generator);

    match cli.command {
        Commands::Create {
            name,
            rounds,
            players,
        } => {
            let mut tournament = Tournament::new(name, rounds)?;
            tournament.set_players(
                players
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .map(Player::new),
            )?;
            store.save(&tournament)?;

            println!("Created tournament {}", tournament.id);
            println!("Players: {}", tournament.players().len());
            println!("Rounds:  {}", tournament.round_count());
        }
        Commands::List => {
            let summaries = store.list()?;
            if summaries.is_empty() {
                println!("No tournaments in {:?}", config.data_dir);
            }
            for s in summaries {
                println!(
                    "{}  {:<24} {:>3} players  {}/{} rounds paired  {}",
                    s.id,
                    s.name,
                    s.players,
                    s.rounds_paired,
                    s.rounds,
                    s.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Commands::Show { id } => {
            let tournament = store.load(&TournamentId::from(id))?;
            println!("=== {} ({}) ===", tournament.name, tournament.id);
            for (i, round) in tournament.rounds().iter().enumerate() {
                println!("\nRound {}:", i + 1);
                if round.is_empty() {
                    println!("  (not paired)");
                }
                for (table, pairing) in round.pairings().iter().enumerate() {
                    println!(
                        "  {:>2}. {:<20} {:>4} - {:<4} {}",
                        table + 1,
                        pairing.player1().to_string(),
                        pairing.p1_score(),
                        pairing.p2_score(),
                        pairing.player2()
                    );
                }
            }
        }
        Commands::Pair {
            id,
            round,
            random,
            timeout,
            force,
            dry_run,
        } => {
            let mut tournament = store.load(&TournamentId::from(id))?;

            if let Some(timeout) = timeout {
                let mut pairing_config = config.pairing.clone();
                pairing_config.swiss_timeout_ms = timeout_ms(&timeout)?;
                tournament.set_generator(Arc::new(StandardPairingGenerator::from_config(
                    &pairing_config,
                )));
            }

            let index = match round {
                Some(round) => round_index(round)?,
                None => tournament
                    .next_unpaired_round()
                    .context("Every round already has pairings")?,
            };
            let existing = tournament
                .round(index)
                .with_context(|| format!("Round {} does not exist", index + 1))?;
            if !existing.is_empty() && !force && !dry_run {
                bail!("Round {} already has pairings (use --force)", index + 1);
            }

            // The target round is excluded from standings and history.
            let mut scratch = tournament.clone();
            scratch.clear_round(index)?;
            let pairings = if random {
                scratch.randomize_pairings()?
            } else {
                scratch.swiss_pairings()?
            };

            println!("Round {} pairings:", index + 1);
            for (table, pairing) in pairings.iter().enumerate() {
                println!(
                    "  {:>2}. {} vs {}",
                    table + 1,
                    pairing.player1(),
                    pairing.player2()
                );
            }

            if dry_run {
                println!("\n(dry run - nothing stored)");
            } else {
                tournament.assign_pairings(index, pairings)?;
                store.save(&tournament)?;
            }
        }
        Commands::Score {
            id,
            round,
            table,
            first,
            second,
        } => {
            let mut tournament = store.load(&TournamentId::from(id))?;
            let index = round_index(round)?;
            let pairing = tournament
                .round_mut(index)
                .with_context(|| format!("Round {} does not exist", round))?
                .pairings_mut()
                .get_mut(table_index(table)?)
                .with_context(|| format!("Table {} does not exist in round {}", table, round))?;

            pairing.set_score(first, second);
            println!(
                "Round {}, table {}: {} {} - {} {}",
                round,
                table,
                pairing.player1(),
                first,
                second,
                pairing.player2()
            );
            store.save(&tournament)?;
        }
        Commands::Swap {
            id,
            round,
            first,
            second,
        } => {
            let mut tournament = store.load(&TournamentId::from(id))?;
            let index = round_index(round)?;
            tournament
                .round_mut(index)
                .with_context(|| format!("Round {} does not exist", round))?
                .swap(&Player::new(first.as_str()), &Player::new(second.as_str()))?;

            println!("Swapped {} and {} in round {}", first, second, round);
            store.save(&tournament)?;
        }
        Commands::Standings { id, round, json } => {
            let tournament = store.load(&TournamentId::from(id))?;
            let standings = match round {
                Some(round) => tournament
                    .round(round_index(round)?)
                    .with_context(|| format!("Round {} does not exist", round))?
                    .standings()?,
                None => tournament.player_standings()?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                print_standings(&standings);
            }
        }
        Commands::Delete { id } => {
            store.delete(&TournamentId::from(id.as_str()))?;
            println!("Deleted tournament {}", id);
        }
    }

    Ok(())
}

/// Convert a 1-based round number from the command line to an index.
fn round_index(round: usize) -> Result<usize> {
    if round == 0 {
        bail!("Round numbers start at 1");
    }
    Ok(round - 1)
}

/// Convert a 1-based table number from the command line to an index.
fn table_index(table: usize) -> Result<usize> {
    table
        .checked_sub(1)
        .context("Table numbers start at 1")
}

/// Parse a `--timeout` value into the millisecond budget used by the config.
fn timeout_ms(value: &str) -> Result<u64> {
    let Some(budget) = parse_duration(value) else {
        bail!("Invalid --timeout: {}", value);
    };
    let ms = u64::try_from(budget.as_millis())
        .with_context(|| format!("--timeout {} is too large", value))?;
    if ms == 0 {
        bail!("--timeout must be at least 1ms");
    }
    Ok(ms)
}

fn print_standings(standings: &[Standing]) {
    let mut rank = 0;
    let mut previous = None;
    for (i, standing) in standings.iter().enumerate() {
        if previous != Some(standing.score) {
            rank = i + 1;
            previous = Some(standing.score);
        }
        println!("{:>3}. {:<24} {:>5}", rank, standing.player.to_string(), standing.score);
    }
}
