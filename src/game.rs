// Turn resolver
//
// Advances the authoritative game state by exactly one grid step. Resolution never mutates
// the previous snapshot: it clones the snakes, runs direction resolution, movement,
// collision detection and the terminal check on the copy, and returns the new state.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bot::Bot;
use crate::config::Config;
use crate::types::{Difficulty, GameEvent, GameMode, Outcome, Point, Snake};

/// Snapshot of everything the tick needs and everything a renderer shows
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GameState {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub snakes: Vec<Snake>,
    pub food: Point,
    /// Current logical tick interval; shrinks as food is eaten
    pub tick_interval_ms: u64,
    pub turn: u32,
}

impl GameState {
    pub fn snake(&self, id: u32) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    pub fn snake_mut(&mut self, id: u32) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.id == id)
    }

    pub fn scores(&self) -> Vec<u32> {
        self.snakes.iter().map(|s| s.score).collect()
    }

    /// Highest score across all snakes, compared against the stored high score
    pub fn max_score(&self) -> u32 {
        self.snakes.iter().map(|s| s.score).max().unwrap_or(0)
    }
}

/// Result of one tick
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    pub outcome: Outcome,
}

impl TurnReport {
    pub fn food_eaten(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::FoodEaten { .. }))
    }
}

/// Rejection-samples a free cell for the food
///
/// # Returns
/// * `Option<Point>` - A cell not covered by any snake segment, or `None` once `attempts` samples all hit a snake
pub fn spawn_food<R: Rng>(
    snakes: &[Snake],
    grid_size: i32,
    attempts: u32,
    rng: &mut R,
) -> Option<Point> {
    if grid_size <= 0 {
        return None;
    }

    for _ in 0..attempts {
        let candidate = Point {
            x: rng.random_range(0..grid_size),
            y: rng.random_range(0..grid_size),
        };

        if !snakes.iter().any(|s| s.occupies(&candidate)) {
            return Some(candidate);
        }
    }
    None
}

/// Owns the bot engine and the rules constants; stateless between ticks
#[derive(Debug, Clone)]
pub struct TurnResolver {
    config: Config,
    bot: Bot,
}

impl TurnResolver {
    pub fn new(config: Config) -> Self {
        TurnResolver {
            bot: Bot::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Builds the opening layout: the human snake, the bot in PLAYER_VS_BOT, and the first food
    pub fn new_game<R: Rng>(&self, mode: GameMode, difficulty: Difficulty, rng: &mut R) -> GameState {
        let spawn = &self.config.spawn;

        let mut snakes = vec![Snake::new(
            1,
            &spawn.player_one_name,
            spawn.player_one.clone(),
            spawn.initial_direction,
            false,
        )];

        if mode == GameMode::PlayerVsBot {
            snakes.push(Snake::new(
                2,
                &spawn.player_two_name,
                spawn.player_two.clone(),
                spawn.initial_direction,
                true,
            ));
        }

        let food = spawn_food(
            &snakes,
            self.config.board.grid_size,
            self.config.food.spawn_attempts,
            rng,
        )
        .unwrap_or(self.config.food.fallback_position);

        GameState {
            mode,
            difficulty,
            snakes,
            food,
            tick_interval_ms: self.config.timing.initial_tick_ms,
            turn: 0,
        }
    }

    /// Resolves one tick
    ///
    /// 1. Directions: bots ask the engine, humans adopt their buffered direction unless it reverses
    /// 2. Movement: every live snake steps; eating grows it, scores and speeds the game up
    /// 3. Collisions: evaluated after all snakes moved, walls first, then every live body
    /// 4. Terminal check for the game mode, then food respawn if the game goes on
    pub fn resolve<R: Rng>(&self, state: &GameState, rng: &mut R) -> TurnReport {
        let mut snakes = state.snakes.clone();
        let mut events = Vec::new();
        let alive: Vec<bool> = snakes.iter().map(|s| !s.is_dead).collect();

        self.resolve_directions(&mut snakes, state.food, state.difficulty, rng);

        let mut tick_interval_ms = state.tick_interval_ms;
        let mut food_eaten = false;

        for snake in snakes.iter_mut().filter(|s| !s.is_dead) {
            let head = match snake.head() {
                Some(head) => head,
                None => continue,
            };

            let new_head = snake.direction.apply(&head);
            snake.body.insert(0, new_head);

            if new_head == state.food {
                snake.score += self.config.scoring.food_reward;
                food_eaten = true;
                tick_interval_ms = self.config.timing.next_interval(tick_interval_ms);
                events.push(GameEvent::FoodEaten { snake_id: snake.id });
            } else {
                snake.body.pop();
            }
        }

        let crashed: Vec<usize> = (0..snakes.len())
            .filter(|&i| alive[i] && self.head_collides(i, &snakes, &alive))
            .collect();

        for i in crashed {
            let snake = &mut snakes[i];
            snake.is_dead = true;
            info!(
                "Turn {}: {} (id {}) died at {:?}",
                state.turn + 1,
                snake.name,
                snake.id,
                snake.head()
            );
            events.push(GameEvent::SnakeDied { snake_id: snake.id });
        }

        let outcome = Self::evaluate_outcome(state.mode, &snakes);

        let mut food = state.food;
        if food_eaten && !outcome.is_terminal() {
            match spawn_food(
                &snakes,
                self.config.board.grid_size,
                self.config.food.spawn_attempts,
                rng,
            ) {
                Some(next) => food = next,
                None => warn!(
                    "Turn {}: no free cell after {} attempts, food stays at {:?}",
                    state.turn + 1,
                    self.config.food.spawn_attempts,
                    food
                ),
            }
        }

        if outcome.is_terminal() {
            info!("Turn {}: game over ({:?})", state.turn + 1, outcome);
        }

        TurnReport {
            state: GameState {
                mode: state.mode,
                difficulty: state.difficulty,
                snakes,
                food,
                tick_interval_ms,
                turn: state.turn + 1,
            },
            events,
            outcome,
        }
    }

    fn resolve_directions<R: Rng>(
        &self,
        snakes: &mut [Snake],
        food: Point,
        difficulty: Difficulty,
        rng: &mut R,
    ) {
        for i in 0..snakes.len() {
            if snakes[i].is_dead {
                continue;
            }

            let direction = if snakes[i].is_bot {
                let bot = &snakes[i];
                let opponent = snakes.iter().find(|s| s.id != bot.id);
                self.bot.get_move(bot, opponent, food, difficulty, rng)
            } else {
                let requested = snakes[i].next_direction;
                if requested.is_opposite(snakes[i].direction) {
                    snakes[i].direction
                } else {
                    requested
                }
            };

            snakes[i].direction = direction;
        }
    }

    /// Wall or body hit for the snake at `index`, against post-move bodies.
    /// A snake's own head is skipped; snakes dead before this tick are not obstacles.
    fn head_collides(&self, index: usize, snakes: &[Snake], alive: &[bool]) -> bool {
        let head = match snakes[index].head() {
            Some(head) => head,
            None => return false,
        };

        if !head.in_bounds(self.config.board.grid_size) {
            return true;
        }

        snakes
            .iter()
            .enumerate()
            .filter(|(j, _)| alive[*j])
            .any(|(j, other)| {
                let skip = if j == index { 1 } else { 0 };
                other.body.iter().skip(skip).any(|segment| *segment == head)
            })
    }

    fn evaluate_outcome(mode: GameMode, snakes: &[Snake]) -> Outcome {
        match mode {
            GameMode::SinglePlayer => {
                if snakes.iter().all(|s| s.is_dead) {
                    Outcome::Finished
                } else {
                    Outcome::Ongoing
                }
            }
            GameMode::PlayerVsBot => {
                let survivors: Vec<&Snake> = snakes.iter().filter(|s| !s.is_dead).collect();
                match survivors.as_slice() {
                    [] => Outcome::Draw,
                    [winner] if snakes.len() > 1 => Outcome::Won {
                        winner_id: winner.id,
                    },
                    _ => Outcome::Ongoing,
                }
            }
        }
    }
}
