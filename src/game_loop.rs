// Game loop context
//
// Holds what the tick itself must not own: the status state machine, the clock baseline,
// buffered human input and the high-score store. The driver calls `update` at display
// rate; a logical tick only fires once the elapsed time exceeds the current tick interval.

use log::{info, warn};
use rand::Rng;

use crate::config::Config;
use crate::game::{GameState, TurnReport, TurnResolver};
use crate::store::{load_high_score, save_high_score, ScoreStore};
use crate::types::{Difficulty, Direction, GameEvent, GameMode, GameStatus, Outcome};

pub struct GameLoop<S: ScoreStore> {
    resolver: TurnResolver,
    store: S,
    status: GameStatus,
    mode: Option<GameMode>,
    difficulty: Difficulty,
    state: Option<GameState>,
    outcome: Option<Outcome>,
    last_update_ms: u64,
    high_score: u32,
}

impl<S: ScoreStore> GameLoop<S> {
    /// Creates a loop sitting in the menu, with the high score read from `store`
    pub fn new(config: Config, store: S) -> Self {
        let high_score = load_high_score(&store, &config.scoring.high_score_key);

        GameLoop {
            resolver: TurnResolver::new(config),
            store,
            status: GameStatus::Menu,
            mode: None,
            difficulty: Difficulty::default(),
            state: None,
            outcome: None,
            last_update_ms: 0,
            high_score,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Latest published snapshot
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Outcome of the last finished game, cleared on start
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolver(&self) -> &TurnResolver {
        &self.resolver
    }

    /// Starts a fresh game and anchors the clock at `now_ms`. Speed resets here and only here.
    pub fn start<R: Rng>(&mut self, mode: GameMode, difficulty: Difficulty, now_ms: u64, rng: &mut R) {
        info!("Starting {:?} game on {}", mode, difficulty.as_str());

        self.mode = Some(mode);
        self.difficulty = difficulty;
        self.state = Some(self.resolver.new_game(mode, difficulty, rng));
        self.outcome = None;
        self.status = GameStatus::Playing;
        self.last_update_ms = now_ms;
    }

    /// Starts again with the previous mode and difficulty. No-op before the first game.
    pub fn restart<R: Rng>(&mut self, now_ms: u64, rng: &mut R) {
        if let Some(mode) = self.mode {
            self.start(mode, self.difficulty, now_ms, rng);
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
        }
    }

    /// Resumes play. The baseline moves to `now_ms` so the pause is not replayed as a burst.
    pub fn resume(&mut self, now_ms: u64) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            self.last_update_ms = now_ms;
        }
    }

    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.status {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(now_ms),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.status = GameStatus::Menu;
    }

    /// Buffers a direction for a human snake; the latest request before a tick wins
    ///
    /// # Returns
    /// * `bool` - Whether the input was accepted (playing, snake exists, alive and human)
    pub fn set_direction(&mut self, snake_id: u32, direction: Direction) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }

        match self.state.as_mut().and_then(|s| s.snake_mut(snake_id)) {
            Some(snake) if !snake.is_dead && !snake.is_bot => {
                snake.next_direction = direction;
                true
            }
            _ => false,
        }
    }

    /// Drives the loop from the display clock
    ///
    /// # Returns
    /// * `Option<TurnReport>` - The tick that fired, or `None` if not playing or not yet due
    pub fn update<R: Rng>(&mut self, now_ms: u64, rng: &mut R) -> Option<TurnReport> {
        if self.status != GameStatus::Playing {
            return None;
        }

        let state = self.state.as_ref()?;
        let elapsed = now_ms.saturating_sub(self.last_update_ms);
        if elapsed <= state.tick_interval_ms {
            return None;
        }

        self.last_update_ms = now_ms;
        let mut report = self.resolver.resolve(state, rng);

        if report.outcome.is_terminal() {
            self.finish_game(&mut report);
        }

        self.state = Some(report.state.clone());
        Some(report)
    }

    /// Terminal bookkeeping: final audio signal, high score, status
    fn finish_game(&mut self, report: &mut TurnReport) {
        let state = &report.state;

        let human_won = match report.outcome {
            Outcome::Won { winner_id } => state.snake(winner_id).map_or(false, |s| !s.is_bot),
            _ => false,
        };
        let solo_record = state.mode == GameMode::SinglePlayer
            && state.snakes.iter().any(|s| !s.is_bot && s.score > self.high_score);

        report.events.push(if human_won || solo_record {
            GameEvent::GameWon
        } else {
            GameEvent::GameOver
        });

        let best = state.max_score();
        if best > self.high_score {
            info!("New high score: {} (was {})", best, self.high_score);
            self.high_score = best;
            let key = &self.resolver.config().scoring.high_score_key;
            if let Err(e) = save_high_score(&self.store, key, best) {
                warn!("Could not persist high score: {}", e);
            }
        }

        self.outcome = Some(report.outcome);
        self.status = GameStatus::GameOver;
    }
}
