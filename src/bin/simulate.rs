// Headless batch simulator
//
// Usage:
//   cargo run --release --bin simulate -- [options]
//
// Options:
//   --games <n>            Number of games (default: 100)
//   --bot <level>          Bot difficulty: easy, medium, hard (default: hard)
//   --player <level>       Engine level steering the player slot (default: medium)
//   --solo                 Single-player games instead of player vs bot
//   --seed <n>             First seed; game i uses seed + i (default: 0)
//   --json                 Print per-game summaries as JSON lines
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;
use std::time::Instant;

use neon_snake::config::Config;
use neon_snake::simulation::{Matchup, Simulator};
use neon_snake::types::{Difficulty, GameMode};

fn print_usage() {
    eprintln!("Snake Batch Simulator");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  simulate [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <n>        Number of games (default: 100)");
    eprintln!("  --bot <level>      Bot difficulty: easy, medium, hard (default: hard)");
    eprintln!("  --player <level>   Engine level steering the player slot (default: medium)");
    eprintln!("  --solo             Single-player games");
    eprintln!("  --seed <n>         First seed (default: 0)");
    eprintln!("  --json             Print per-game summaries as JSON lines");
    eprintln!("  --config <path>    Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help             Show this help message");
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(raw: &str, what: &str) -> T
where
    T::Err: std::fmt::Display,
{
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Error: invalid {} '{}': {}", what, raw, e);
        process::exit(1);
    })
}

fn difficulty_or_exit(raw: &str) -> Difficulty {
    Difficulty::parse(raw).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(0);
    }

    let mut games = 100u64;
    let mut seed = 0u64;
    let mut json = false;
    let mut config_path = "Snake.toml".to_string();
    let mut matchup = Matchup {
        mode: GameMode::PlayerVsBot,
        bot: Difficulty::Hard,
        human: Difficulty::Medium,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = parse_or_exit(option_value(&args, i, "--games"), "game count");
                i += 1;
            }
            "--bot" => {
                matchup.bot = difficulty_or_exit(option_value(&args, i, "--bot"));
                i += 1;
            }
            "--player" => {
                matchup.human = difficulty_or_exit(option_value(&args, i, "--player"));
                i += 1;
            }
            "--seed" => {
                seed = parse_or_exit(option_value(&args, i, "--seed"), "seed");
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--solo" => matchup.mode = GameMode::SinglePlayer,
            "--json" => json = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    let simulator = Simulator::new(config);
    let start_time = Instant::now();
    let results = simulator.run_batch(matchup, games, seed);
    let elapsed = start_time.elapsed();

    if json {
        for result in &results {
            match serde_json::to_string(result) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("Error: could not serialize game {}: {}", result.seed, e),
            }
        }
    }

    let stats = Simulator::summarize(&results);
    Simulator::print_report(matchup, &stats);
    println!(
        "Simulated {} games in {:.2}s on {} threads",
        games,
        elapsed.as_secs_f64(),
        rayon::current_num_threads()
    );
}
