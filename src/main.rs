//! Baghchal-Rust: a Bagh Chal engine with a minimax tiger.
//!
//! ## Usage
//!
//! - `baghchal-rust` - Play and print one demo game
//! - `baghchal-rust btp` - Start the BTP server for front ends
//! - `baghchal-rust selfplay --games 20` - Tally results of many games

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use baghchal_rust::btp::BtpEngine;
use baghchal_rust::constants::{DEFAULT_DEPTH, MAX_GAME_LEN};
use baghchal_rust::playout::{play_game, play_game_with};
use baghchal_rust::position::{Position, Side};
use baghchal_rust::search::TigerBot;

/// Baghchal-Rust: Bagh Chal rules engine and tiger opponent
#[derive(Parser)]
#[command(name = "baghchal-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the BTP (Bagh chal Text Protocol) server on stdin/stdout
    Btp {
        #[command(flatten)]
        search: SearchArgs,
        /// Print search details to stderr
        #[arg(long)]
        verbose: bool,
    },
    /// Play one game of the tiger bot against random goats
    Demo {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play many games and report the results
    Selfplay {
        #[command(flatten)]
        search: SearchArgs,
        /// Number of games to play
        #[arg(long, default_value_t = 10)]
        games: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,
    /// Random seed (entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn bot(&self) -> TigerBot {
        match self.seed {
            Some(seed) => TigerBot::with_seed(self.depth, seed),
            None => TigerBot::new(self.depth),
        }
    }

    fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(1)),
            None => fastrand::Rng::new(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Btp { search, verbose }) => {
            let mut engine = BtpEngine::with_bot(search.bot());
            engine.set_verbose(verbose);
            engine.run().context("BTP session failed")?;
        }
        Some(Commands::Demo { search }) => run_demo(&search),
        Some(Commands::Selfplay { search, games }) => run_selfplay(&search, games),
        None => run_demo(&SearchArgs {
            depth: DEFAULT_DEPTH,
            seed: None,
        }),
    }
    Ok(())
}

fn run_demo(search: &SearchArgs) {
    println!("Baghchal-Rust: tiger bot (depth {}) vs random goats\n", search.depth);
    println!("{}", Position::new());

    let mut bot = search.bot();
    let mut rng = search.rng();
    let record = play_game_with(&mut bot, &mut rng, MAX_GAME_LEN, |mv, pos| {
        let mover = pos.turn().opponent();
        println!("{mover} plays {mv}");
        println!("{pos}");
    });

    match record.winner {
        Some(winner) => println!("Winner: {winner} after {} plies", record.moves.len()),
        None => println!("No winner after {} plies", record.moves.len()),
    }
}

fn run_selfplay(search: &SearchArgs, games: usize) {
    let mut bot = search.bot();
    let mut rng = search.rng();
    let (mut tiger, mut goat, mut undecided) = (0, 0, 0);
    let mut total_plies = 0;

    for game in 1..=games {
        let record = play_game(&mut bot, &mut rng, MAX_GAME_LEN);
        total_plies += record.moves.len();
        match record.winner {
            Some(Side::Tiger) => tiger += 1,
            Some(Side::Goat) => goat += 1,
            None => undecided += 1,
        }
        eprintln!(
            "game {game}: {} in {} plies, {} captured",
            record
                .winner
                .map(|w| w.to_string())
                .unwrap_or_else(|| "undecided".to_string()),
            record.moves.len(),
            record.final_position.goats_captured()
        );
    }

    println!("tiger {tiger}  goat {goat}  undecided {undecided}");
    if games > 0 {
        println!("average length {:.1} plies", total_plies as f64 / games as f64);
    }
}
