use clap::Parser;
use cratepush_solver::board::Direction;
use cratepush_solver::engine::{do_game_move, initialize_game};
use cratepush_solver::heuristics::HeuristicKind;
use cratepush_solver::level::{Level, LevelFormat};
use cratepush_solver::solver::{
    solve_with_config, SearchStrategy, SolverConfig, DEFAULT_EXPANSION_BUDGET,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Search for a winning move sequence", long_about = None)]
struct Args {
    /// Maximum number of search nodes to expand
    #[clap(short, long, default_value_t = DEFAULT_EXPANSION_BUDGET)]
    budget: usize,

    /// Heuristic used to order the frontier
    #[clap(long, value_enum, default_value = "compound")]
    heuristic: HeuristicKind,

    /// Frontier ordering
    #[clap(long, value_enum, default_value = "greedy")]
    strategy: SearchStrategy,

    /// Only expand single steps, never walks to keys and coins
    #[clap(long)]
    no_macro_moves: bool,

    /// Keep states whose goals look sealed off
    #[clap(long)]
    no_pruning: bool,

    /// Level file format; detected from the contents when omitted
    #[clap(short, long, value_enum)]
    format: Option<LevelFormat>,

    /// Path to the level file (ASCII, encoded or JSON)
    level_file: PathBuf,
}

fn format_moves(moves: &[Direction]) -> String {
    moves.iter().map(|d| d.to_char()).collect()
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match Level::from_file(&args.level_file, args.format) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.level_file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let game = initialize_game(&level);
    println!("Loaded level '{}' from {}\n", level.name(), args.level_file.display());
    println!("Initial board state:\n{}\n", game);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
            eprintln!("Warning: could not install Ctrl-C handler: {e}");
        }
    }

    let config = SolverConfig {
        expansion_budget: args.budget,
        strategy: args.strategy,
        macro_moves: !args.no_macro_moves,
        prune_dead_ends: !args.no_pruning,
        ..SolverConfig::default()
    };
    println!(
        "Searching with the {} heuristic ({:?}), budget {}...\n",
        args.heuristic.name(),
        args.strategy,
        args.budget
    );

    let outcome = solve_with_config(&game, args.heuristic.as_fn(), &config, Some(&*cancel));
    println!("Stats: {}\n", outcome.stats);

    match outcome.path {
        Some(moves) => {
            println!("Solution found:\n");
            println!("Moves ({}): {}", moves.len(), format_moves(&moves));

            let mut state = game;
            for &direction in &moves {
                let (next, changed) = do_game_move(&state, direction);
                if !changed {
                    eprintln!("Error: move {direction} was rejected while replaying the solution");
                    return ExitCode::FAILURE;
                }
                state = next;
            }
            println!("Final board state:\n{}\n", state);
            ExitCode::SUCCESS
        }
        None if outcome.stats.cancelled => {
            println!("Search cancelled.\n");
            ExitCode::FAILURE
        }
        None => {
            println!("No solution found.\n");
            ExitCode::FAILURE
        }
    }
}
