use clap::Parser;
use cratepush_solver::board::Direction;
use cratepush_solver::engine::Session;
use cratepush_solver::heuristics::compound;
use cratepush_solver::level::{Level, LevelFormat};
use cratepush_solver::pathfinding::{can_move_to, PathOptions};
use cratepush_solver::solver::solve;
use cratepush_solver::utils::board_from_str_array;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const HINT_BUDGET: usize = 50_000;

const DEFAULT_LEVEL: [&str; 7] = [
    "#########",
    "#P..#..F#",
    "#.C.#.O.#",
    "#..$D...#",
    "#k..#.C.#",
    "#...I..$#",
    "#########",
];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a crate-pushing level in the terminal", long_about = None)]
struct Args {
    /// Level file to play; a built-in level is used when omitted
    level_file: Option<PathBuf>,

    /// Level file format; detected from the contents when omitted
    #[clap(short, long, value_enum)]
    format: Option<LevelFormat>,
}

fn load_level(args: &Args) -> Result<Level, String> {
    match &args.level_file {
        Some(path) => Level::from_file(path, args.format)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e)),
        None => board_from_str_array(&DEFAULT_LEVEL)
            .map_err(|e| e.to_string())
            .and_then(|board| Level::new("default", board).map_err(|e| e.to_string())),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  w a s d   move up / left / down / right (several at once, e.g. 'ddw')");
    println!("  g X Y     walk to column X, row Y over free floor");
    println!("  u         undo the last move");
    println!("  r         restart the level");
    println!("  h         ask the solver for the next move");
    println!("  ?         show this help");
    println!("  q         quit");
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match load_level(&args) {
        Ok(level) => level,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(&level);
    println!("Welcome to {}!", level.name());
    print_help();

    loop {
        let game = session.current();
        println!("---------------------");
        println!(
            "Steps: {}, Coins: {}/{}, Keys: {}",
            session.steps(),
            game.coins(),
            game.max_coins(),
            game.keys()
        );
        println!("{game}");
        if let Some(sound) = game.sound() {
            println!("({sound:?})");
        }

        if game.won() {
            println!();
            println!("---------------------");
            println!("🎉 LEVEL COMPLETE! 🎉");
            println!("Total Steps: {}", session.steps());
            println!("---------------------");
            break;
        }

        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [] => continue,
            ["q"] => {
                println!("Thanks for playing!");
                break;
            }
            ["?"] => print_help(),
            ["h"] => match solve(session.current(), compound, HINT_BUDGET) {
                Some(path) => match path.first() {
                    Some(direction) => println!(
                        "Hint: move {direction:?} ({} moves to go).",
                        path.len()
                    ),
                    None => println!("Already solved."),
                },
                None => println!("No hint: the solver found no way forward from here."),
            },
            ["u"] => {
                if !session.undo() {
                    println!("Nothing to undo.");
                }
            }
            ["r"] => session.restart(),
            ["g", x, y] => match (x.parse::<i32>(), y.parse::<i32>()) {
                (Ok(x), Ok(y)) => {
                    match can_move_to(session.current(), x, y, PathOptions::default()) {
                        Some(path) => {
                            session.apply_all(&path);
                        }
                        None => println!("No free path to ({x}, {y})."),
                    }
                }
                _ => println!("Invalid coordinates: use 'g X Y' with whole numbers."),
            },
            [keys] => {
                let directions: Option<Vec<Direction>> = keys.chars().map(Direction::from_key).collect();
                match directions {
                    Some(directions) => {
                        let applied = session.apply_all(&directions);
                        if applied < directions.len() {
                            println!("Blocked after {applied} of {} moves.", directions.len());
                        }
                    }
                    None => println!("Unknown command '{keys}'. Type '?' for help."),
                }
            }
            _ => println!("Unknown command. Type '?' for help."),
        }
    }
    ExitCode::SUCCESS
}
