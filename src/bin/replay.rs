// Re-runs /move decisions from a debug log through the bot engine
//
//   replay <log_file> (--all | --decisions 3,7 | --validate 3:up,7:left|down)
//          [--seed <n>] [--verbose] [--config <path>]

use std::env;
use std::process;

use neon_snake::config::Config;
use neon_snake::replay::{LogEntry, ReplayEngine};
use neon_snake::types::Direction;

const USAGE: &str = "\
usage: replay <log_file> (--all | --decisions <S,...> | --validate <S:M[|M],...>)
              [--seed <n>] [--verbose] [--config <path>]

  --all          replay every logged decision
  --decisions    replay the listed sequence numbers
  --validate     check logged moves; '|' separates acceptable alternatives
  --seed         random seed for EASY decisions (default 0)
  --verbose      log every decision
  --config       config file (default Snake.toml)";

enum Action {
    All,
    Decisions(Vec<u64>),
    Validate(Vec<(u64, Vec<Direction>)>),
}

struct Options {
    log_file: String,
    action: Action,
    seed: u64,
    verbose: bool,
    config_path: String,
}

fn parse_sequence(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("Invalid decision number '{}': {}", raw, e))
}

/// `3:up,7:left|down` -> [(3, [Up]), (7, [Left, Down])]
fn parse_expectations(raw: &str) -> Result<Vec<(u64, Vec<Direction>)>, String> {
    raw.split(',')
        .map(|pair| {
            let (sequence, moves) = pair
                .split_once(':')
                .ok_or_else(|| format!("Expected 'sequence:move', got '{}'", pair))?;
            let moves = moves
                .split('|')
                .map(Direction::parse)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((parse_sequence(sequence)?, moves))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut iter = args.iter().skip(1);
    let log_file = iter.next().ok_or("Missing log file")?.clone();

    let mut action = None;
    let mut seed = 0;
    let mut verbose = false;
    let mut config_path = "Snake.toml".to_string();

    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| format!("{} requires a value", flag))
        };

        match flag.as_str() {
            "--all" => action = Some(Action::All),
            "--decisions" => {
                let sequences = value()?
                    .split(',')
                    .map(parse_sequence)
                    .collect::<Result<Vec<_>, _>>()?;
                action = Some(Action::Decisions(sequences));
            }
            "--validate" => action = Some(Action::Validate(parse_expectations(value()?)?)),
            "--seed" => {
                let raw = value()?;
                seed = raw
                    .parse()
                    .map_err(|e| format!("Invalid seed '{}': {}", raw, e))?;
            }
            "--config" => config_path = value()?.clone(),
            "--verbose" => verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    Ok(Options {
        log_file,
        action: action.ok_or("One of --all, --decisions or --validate is required")?,
        seed,
        verbose,
        config_path,
    })
}

fn run(options: Options) -> Result<(), String> {
    let config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        log::warn!("{}; using built-in defaults", e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, options.verbose).with_seed(options.seed);
    let entries: Vec<LogEntry> = engine.load_log_file(&options.log_file)?;
    if entries.is_empty() {
        return Err(format!("{} contains no decisions", options.log_file));
    }

    match options.action {
        Action::All => engine.print_report(&engine.replay_all(&entries)),
        Action::Decisions(sequences) => {
            engine.print_report(&engine.replay_sequences(&entries, &sequences)?)
        }
        Action::Validate(expected) => {
            engine.validate_expected_moves(&entries, &expected)?;
            println!("{} expectation(s) hold", expected.len());
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let result = parse_args(&args).and_then(run);
    if let Err(e) = result {
        eprintln!("replay: {}\n\n{}", e, USAGE);
        process::exit(1);
    }
}
