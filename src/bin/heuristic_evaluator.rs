use clap::Parser;
use cratepush_solver::board::Board;
use cratepush_solver::engine::{do_game_move, initialize_game};
use cratepush_solver::heuristics::HeuristicKind;
use cratepush_solver::level::Level;
use cratepush_solver::solver::{solve_with_config, SearchStrategy, SolverConfig};
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare heuristics on seeded random boards", long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short = 'n', long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    #[clap(long, default_value_t = 8)]
    width: usize,

    #[clap(long, default_value_t = 8)]
    height: usize,

    /// Expansion budget per solve
    #[clap(short, long, default_value_t = 20_000)]
    budget: usize,

    #[clap(long, value_enum, default_value = "greedy")]
    strategy: SearchStrategy,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    expanded: usize,
    moves: usize,
}

fn main() {
    let args = Args::parse();
    let config = SolverConfig {
        expansion_budget: args.budget,
        strategy: args.strategy,
        ..SolverConfig::default()
    };

    let mut tallies: HashMap<HeuristicKind, Tally> = HashMap::new();
    println!("Starting heuristic evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let board = Board::new_random_with_seed(args.width, args.height, current_seed);
        let level = match Level::new(format!("random-{current_seed}"), board) {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Warning: skipping board {board_idx} (Seed: {current_seed}): {e}");
                continue;
            }
        };
        let game = initialize_game(&level);
        println!("\nEvaluating Board {} (Seed: {})\n{}", board_idx, current_seed, game);

        for kind in HeuristicKind::ALL {
            let outcome = solve_with_config(&game, kind.as_fn(), &config, None);
            let tally = tallies.entry(kind).or_default();
            tally.expanded += outcome.stats.expanded;

            match outcome.path {
                Some(path) => {
                    let won = path
                        .iter()
                        .try_fold(game.clone(), |state, &d| {
                            let (next, changed) = do_game_move(&state, d);
                            changed.then_some(next)
                        })
                        .is_some_and(|end| end.won());
                    if !won {
                        eprintln!(
                            "Error: {} returned a path that does not win board {} (Seed: {})",
                            kind.name(),
                            board_idx,
                            current_seed
                        );
                        continue;
                    }
                    tally.solved += 1;
                    tally.moves += path.len();
                    println!(
                        "  Heuristic: {:<10}, Moves: {:<6}, Expanded: {}",
                        kind.name(),
                        path.len(),
                        outcome.stats.expanded
                    );
                }
                None => println!(
                    "  Heuristic: {:<10}, unsolved, Expanded: {}",
                    kind.name(),
                    outcome.stats.expanded
                ),
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Summary ---");

    let mut rows: Vec<(HeuristicKind, &Tally)> = tallies.iter().map(|(k, t)| (*k, t)).collect();
    // Most solved first, then fewest expansions.
    rows.sort_by(|a, b| b.1.solved.cmp(&a.1.solved).then(a.1.expanded.cmp(&b.1.expanded)));

    for (kind, tally) in rows {
        let avg_moves = if tally.solved > 0 {
            tally.moves as f64 / tally.solved as f64
        } else {
            0.0
        };
        let avg_expanded = tally.expanded as f64 / args.boards.max(1) as f64;
        println!(
            "Heuristic {:<10}: Solved = {}/{}, Avg Moves = {:.2}, Avg Expanded = {:.1}",
            kind.name(),
            tally.solved,
            args.boards,
            avg_moves,
            avg_expanded
        );
    }
}
