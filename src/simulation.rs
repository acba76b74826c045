// Headless simulation
//
// Plays complete games with no human at the keyboard: the human slot is steered by the bot
// engine through the normal buffered-input path, and a synthetic clock advances the loop one
// tick interval at a time. Batches run in parallel on the rayon pool, one seeded RNG per game.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::Config;
use crate::game_loop::GameLoop;
use crate::store::MemoryStore;
use crate::types::{Difficulty, GameMode, Outcome};

/// Final result of one simulated game
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub turns: u32,
    /// `Ongoing` when the game hit the turn cap
    pub outcome: Outcome,
    pub scores: Vec<u32>,
    pub final_tick_ms: u64,
}

/// Aggregate over a batch
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchStats {
    pub games: usize,
    pub human_wins: usize,
    pub bot_wins: usize,
    pub draws: usize,
    pub solo_finished: usize,
    pub capped: usize,
    pub average_turns: f64,
    pub average_human_score: f64,
    pub average_bot_score: f64,
    pub best_score: u32,
}

/// Which engine level plays each side
#[derive(Debug, Clone, Copy)]
pub struct Matchup {
    pub mode: GameMode,
    pub bot: Difficulty,
    pub human: Difficulty,
}

pub struct Simulator {
    config: Config,
}

impl Simulator {
    pub fn new(config: Config) -> Self {
        Simulator { config }
    }

    /// Plays one game to completion or to the configured turn cap
    pub fn play_game(&self, matchup: Matchup, seed: u64) -> GameSummary {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = GameLoop::new(self.config.clone(), MemoryStore::new());
        let mut now_ms = 0;
        game.start(matchup.mode, matchup.bot, now_ms, &mut rng);

        let max_turns = self.config.simulation.max_turns;
        let mut outcome = Outcome::Ongoing;

        while let Some(state) = game.state() {
            if state.turn >= max_turns {
                debug!("Seed {}: turn cap {} reached", seed, max_turns);
                break;
            }

            let human_moves: Vec<_> = state
                .snakes
                .iter()
                .filter(|s| !s.is_bot && !s.is_dead)
                .map(|human| {
                    let opponent = state.snakes.iter().find(|s| s.id != human.id);
                    let dir = game.resolver().bot().get_move(
                        human,
                        opponent,
                        state.food,
                        matchup.human,
                        &mut rng,
                    );
                    (human.id, dir)
                })
                .collect();

            now_ms += state.tick_interval_ms + 1;
            for (id, dir) in human_moves {
                game.set_direction(id, dir);
            }

            match game.update(now_ms, &mut rng) {
                Some(report) if report.outcome.is_terminal() => {
                    outcome = report.outcome;
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        let (turns, scores, final_tick_ms) = game
            .state()
            .map(|s| (s.turn, s.scores(), s.tick_interval_ms))
            .unwrap_or((0, Vec::new(), self.config.timing.initial_tick_ms));

        GameSummary {
            seed,
            turns,
            outcome,
            scores,
            final_tick_ms,
        }
    }

    /// Plays `games` games in parallel with seeds `base_seed..base_seed + games`
    pub fn run_batch(&self, matchup: Matchup, games: u64, base_seed: u64) -> Vec<GameSummary> {
        (0..games)
            .into_par_iter()
            .map(|i| self.play_game(matchup, base_seed.wrapping_add(i)))
            .collect()
    }

    /// Human is snake id 1, the bot id 2, as laid out by the turn resolver
    pub fn summarize(results: &[GameSummary]) -> BatchStats {
        let mut stats = BatchStats {
            games: results.len(),
            ..BatchStats::default()
        };

        if results.is_empty() {
            return stats;
        }

        for result in results {
            match result.outcome {
                Outcome::Won { winner_id: 1 } => stats.human_wins += 1,
                Outcome::Won { .. } => stats.bot_wins += 1,
                Outcome::Draw => stats.draws += 1,
                Outcome::Finished => stats.solo_finished += 1,
                Outcome::Ongoing => stats.capped += 1,
            }
            let best = result.scores.iter().copied().max().unwrap_or(0);
            stats.best_score = stats.best_score.max(best);
        }

        let n = results.len() as f64;
        stats.average_turns = results.iter().map(|r| r.turns as f64).sum::<f64>() / n;
        stats.average_human_score = results
            .iter()
            .map(|r| r.scores.first().copied().unwrap_or(0) as f64)
            .sum::<f64>()
            / n;
        stats.average_bot_score = results
            .iter()
            .map(|r| r.scores.get(1).copied().unwrap_or(0) as f64)
            .sum::<f64>()
            / n;

        stats
    }

    /// Prints a batch report to stdout
    pub fn print_report(matchup: Matchup, stats: &BatchStats) {
        println!("\n═══════════════════════════════════════════════════════════");
        println!("                  SIMULATION REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Mode:           {:?}", matchup.mode);
        println!("Bot:            {}", matchup.bot.as_str());
        println!("Player slot:    {}", matchup.human.as_str());
        println!("Games:          {}", stats.games);
        if matchup.mode == GameMode::PlayerVsBot {
            println!("Player wins:    {}", stats.human_wins);
            println!("Bot wins:       {}", stats.bot_wins);
            println!("Draws:          {}", stats.draws);
        } else {
            println!("Finished:       {}", stats.solo_finished);
        }
        println!("Turn capped:    {}", stats.capped);
        println!("═══════════════════════════════════════════════════════════");
        println!("Average turns:        {:.1}", stats.average_turns);
        println!("Average player score: {:.1}", stats.average_human_score);
        if matchup.mode == GameMode::PlayerVsBot {
            println!("Average bot score:    {:.1}", stats.average_bot_score);
        }
        println!("Best score:           {}\n", stats.best_score);
    }
}
