// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for running games and tournaments
//
// Logging goes through env_logger; set RUST_LOG=info (or debug) to see
// the engine's per-game and per-move records.
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use log::info;
use shinobi_engine::{GameConfig, GameRegistry};
use shinobi_tournament::{run_batch, run_game, AgentKind, BatchConfig, BatchSummary};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shinobi-runner", about = "Shinobi headless game lab")]
struct Cli {
    /// JSON file overriding the default game configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single game with agents
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 4)]
        players: usize,
        /// Agent type: "random", "heuristic" or "mixed"
        #[arg(short, long, default_value_t = AgentKind::Random)]
        agent: AgentKind,
        #[arg(long, default_value_t = 1_000)]
        max_moves: usize,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a tournament of N games in parallel
    Tournament {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 4)]
        players: usize,
        /// Agent type: "random", "heuristic" or "mixed"
        #[arg(short, long, default_value_t = AgentKind::Random)]
        agent: AgentKind,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 1_000)]
        max_moves: usize,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective game configuration
    Config,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    info!("game config: {:?}", config);

    match cli.command {
        Commands::Play { seed, players, agent, max_moves, json } => {
            cmd_play(config, seed, players, agent, max_moves, json)
        }
        Commands::Tournament { games, players, agent, seed, max_moves, json } => {
            let batch = BatchConfig { games, players, agent, base_seed: seed, max_moves };
            cmd_tournament(config, &batch, json)
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn cmd_play(
    config: GameConfig,
    seed: u64,
    players: usize,
    agent: AgentKind,
    max_moves: usize,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let registry = GameRegistry::new(config);
    let result = run_game(&registry, seed, players, agent, max_moves)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("=== Shinobi ===\n");
    println!("Single game: seed={}, players={}, agent={}\n", seed, players, agent);
    println!("Game finished after {} moves", result.moves_played);
    if result.shared_victory() {
        println!("  Shared victory!");
    }
    println!();
    println!("  Final standings:");
    for pr in &result.player_results {
        let color = pr.standing.color.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "    {:6} {:10} {:7} -- total: {:>3}, at home: {:>3}{}",
            pr.standing.name,
            pr.agent_name,
            color,
            pr.standing.color_total,
            pr.standing.own_color_count,
            if pr.won { "  WINNER" } else { "" },
        );
    }
    Ok(())
}

fn cmd_tournament(config: GameConfig, batch: &BatchConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let registry = GameRegistry::new(config);
    if !json {
        println!(
            "=== Tournament: {} games, {} players, agent={} ===\n",
            batch.games, batch.players, batch.agent
        );
    }

    let results = run_batch(&registry, batch);
    let summary = BatchSummary::from_results(batch, &results);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("--- Summary ({} games, {} errors) ---", summary.games, summary.errors);
    println!("  Average moves:    {:.1}", summary.average_moves);
    println!("  Shared victories: {}", summary.shared_victories);
    println!();
    let finished = (summary.games - summary.errors).max(1) as f64;
    for (seat, wins) in summary.wins_by_seat.iter().enumerate() {
        let pct = *wins as f64 / finished * 100.0;
        println!("  seat {}: {:>4} wins ({:.1}%)", seat + 1, wins, pct);
    }
    println!();
    for (name, wins) in &summary.wins_by_agent {
        println!("  {:10}: {:>4} wins", name, wins);
    }
    Ok(())
}
