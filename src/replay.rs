// Replay module for re-running logged bot decisions
//
// This module provides functionality to:
// 1. Parse JSONL debug logs written by the server
// 2. Feed every logged request back into the bot engine
// 3. Compare logged vs replayed moves
// 4. Generate a summary report
//
// EASY decisions are randomized, so they are replayed but never counted as mismatches.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::types::{Difficulty, Direction, MoveRequest};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub sequence: u64,
    pub chosen_move: String,
    pub request: MoveRequest,
    pub timestamp: String,
}

/// Result of replaying a single decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub sequence: u64,
    pub difficulty: Difficulty,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub computation_time_us: u128,
}

impl ReplayResult {
    /// A mismatch only means something when the engine is deterministic at this level
    pub fn is_mismatch(&self) -> bool {
        !self.matches && self.difficulty.is_deterministic()
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_decisions: usize,
    pub randomized: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
    seed: u64,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
            seed: 0,
        }
    }

    /// Seed mixed with each entry's sequence number for EASY replays
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Direction::parse(&entry.chosen_move)?;
        let request = &entry.request;

        let mut rng = StdRng::seed_from_u64(self.seed ^ entry.sequence);
        let start_time = Instant::now();
        let replayed_move = self.bot.get_move(
            &request.bot,
            request.opponent.as_ref(),
            request.food,
            request.difficulty,
            &mut rng,
        );
        let computation_time_us = start_time.elapsed().as_micros();

        let result = ReplayResult {
            sequence: entry.sequence,
            difficulty: request.difficulty,
            original_move,
            replayed_move,
            matches: original_move == replayed_move,
            computation_time_us,
        };

        if self.verbose {
            if result.matches {
                info!(
                    "Decision {}: ✓ MATCH - {} ({}, {}us)",
                    entry.sequence,
                    replayed_move.as_str(),
                    request.difficulty.as_str(),
                    computation_time_us
                );
            } else if result.is_mismatch() {
                warn!(
                    "Decision {}: ✗ MISMATCH - Original: {}, Replayed: {} ({}, {}us)",
                    entry.sequence,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    request.difficulty.as_str(),
                    computation_time_us
                );
            } else {
                info!(
                    "Decision {}: ~ randomized - Original: {}, Replayed: {}",
                    entry.sequence,
                    original_move.as_str(),
                    replayed_move.as_str()
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay decision {}: {}", entry.sequence, e);
                }
            }
        }

        results
    }

    /// Replays specific decisions from a log file
    pub fn replay_sequences(
        &self,
        entries: &[LogEntry],
        sequences: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for sequence in sequences {
            let entry = entries
                .iter()
                .find(|e| e.sequence == *sequence)
                .ok_or_else(|| format!("Decision {} not found in log file", sequence))?;

            results.push(self.replay_entry(entry)?);
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_decisions = results.len();
        let randomized = results
            .iter()
            .filter(|r| !r.difficulty.is_deterministic())
            .count();
        let matches = results
            .iter()
            .filter(|r| r.matches && r.difficulty.is_deterministic())
            .count();
        let mismatches = results.iter().filter(|r| r.is_mismatch()).count();
        let checked = total_decisions - randomized;
        let match_rate = if checked > 0 {
            (matches as f64 / checked as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_decisions,
            randomized,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Decisions: {}", stats.total_decisions);
        println!("Randomized:      {} (EASY, not compared)", stats.randomized);
        println!("Matches:         {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:      {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Decision Time:  {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| r.is_mismatch()).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Decision {}: {} → {} ({})",
                    result.sequence,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.difficulty.as_str()
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u64, Vec<Direction>)], // (sequence, acceptable_moves)
    ) -> Result<(), String> {
        for (sequence, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.sequence == *sequence)
                .ok_or_else(|| format!("Decision {} not found in log", sequence))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Decision {}: Expected one of {:?}, but got {}",
                    sequence,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }
}
