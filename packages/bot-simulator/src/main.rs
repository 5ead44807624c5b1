//! Bot simulator CLI: fast in-memory Speed games for strategy evaluation.
//!
//! Runs head-to-head games straight against the domain engine, no server
//! involved, and reports win rates, commit counts and re-deal frequency.

mod render;
mod simulator;

use clap::{Parser, ValueEnum};
use render::{StdinPrompt, TextRenderer};
use serde::Serialize;
use simulator::run_game;
use speed_backend::bots::profiles::{profile, BotDifficulty};
use speed_backend::bots::registry::make_strategy;
use speed_backend::render::{DifficultyPrompt, GameRenderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bot-simulator")]
#[command(about = "Fast in-memory Speed simulator for bot evaluation")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "100")]
    games: u32,

    /// Strategy tier for the left seat
    #[arg(long, default_value = "hard")]
    left: CliDifficulty,

    /// Strategy tier for the right seat (prompted interactively when omitted)
    #[arg(long)]
    right: Option<CliDifficulty>,

    /// Base seed for deterministic runs; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Render every authoritative update of every game
    #[arg(short, long)]
    verbose: bool,

    /// Emit the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDifficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl From<CliDifficulty> for BotDifficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => BotDifficulty::Easy,
            CliDifficulty::Medium => BotDifficulty::Medium,
            CliDifficulty::Hard => BotDifficulty::Hard,
            CliDifficulty::Impossible => BotDifficulty::Impossible,
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    games: u32,
    left: &'static str,
    right: &'static str,
    left_wins: u32,
    right_wins: u32,
    draws: u32,
    stalemates: u32,
    total_commits: u64,
    total_redeals: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let left: BotDifficulty = args.left.into();
    let right: BotDifficulty = match args.right {
        Some(tier) => tier.into(),
        None => StdinPrompt.prompt_difficulty(),
    };

    let names = [profile(left).name, profile(right).name];
    let base_seed = args.seed.unwrap_or_else(rand::random);
    info!(games = args.games, base_seed, "starting simulation");

    let mut summary = Summary {
        games: args.games,
        left: names[0],
        right: names[1],
        left_wins: 0,
        right_wins: 0,
        draws: 0,
        stalemates: 0,
        total_commits: 0,
        total_redeals: 0,
    };

    let mut renderer = TextRenderer;
    for i in 0..args.games {
        let seed = base_seed.wrapping_add(u64::from(i));
        let mut strategies = [
            make_strategy(left, Some(seed)),
            make_strategy(right, Some(seed ^ 0x5EED)),
        ];
        let render_hook: Option<&mut dyn GameRenderer> =
            args.verbose.then_some(&mut renderer as &mut dyn GameRenderer);

        let outcome = run_game(seed, &mut strategies, names, render_hook);

        match outcome.winner {
            Some(0) => summary.left_wins += 1,
            Some(_) => summary.right_wins += 1,
            None => summary.draws += 1,
        }
        if outcome.stalemate {
            summary.stalemates += 1;
        }
        summary.total_commits += outcome.commits;
        summary.total_redeals += outcome.redeals;
    }

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(out) => println!("{out}"),
            Err(err) => eprintln!("failed to serialize summary: {err}"),
        }
    } else {
        println!(
            "{} games: {} {} – {} {} ({} draws, {} stalemated), {} commits, {} re-deals",
            summary.games,
            summary.left,
            summary.left_wins,
            summary.right_wins,
            summary.right,
            summary.draws,
            summary.stalemates,
            summary.total_commits,
            summary.total_redeals,
        );
    }
}
