// Bot engine
//
// Picks a direction for an autonomous snake every tick. The engine is a pure function of
// (bot, opponent, food, difficulty) plus an injected random source, and it never fails:
// when nothing is safe it keeps its current heading and accepts the crash.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use crate::config::Config;
use crate::types::{Difficulty, Direction, Point, Snake};

/// Cells the bot may not enter this tick: everything off-grid plus every segment of every
/// live snake, taken from the pre-move board.
#[derive(Debug, Clone)]
pub struct Obstacles {
    grid_size: i32,
    occupied: HashSet<Point>,
}

impl Obstacles {
    /// Builds the occupancy set from the given snakes. Dead snakes are ignored.
    pub fn from_snakes<'a, I>(grid_size: i32, snakes: I) -> Self
    where
        I: IntoIterator<Item = &'a Snake>,
    {
        let occupied = snakes
            .into_iter()
            .filter(|s| !s.is_dead)
            .flat_map(|s| s.body.iter().copied())
            .collect();

        Obstacles {
            grid_size,
            occupied,
        }
    }

    /// A cell is safe if it is on the board and no live snake occupies it
    pub fn is_safe(&self, point: &Point) -> bool {
        point.in_bounds(self.grid_size) && !self.occupied.contains(point)
    }
}

/// Autonomous snake controller
/// Holds static configuration; every decision is computed fresh from the board it is given
#[derive(Debug, Clone)]
pub struct Bot {
    config: Config,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chooses the bot's next direction
    ///
    /// # Arguments
    /// * `bot` - The snake being steered
    /// * `opponent` - The other snake, if any. `None` means only walls and the bot's own body matter
    /// * `food` - Current food position
    /// * `difficulty` - Strategy mix to apply
    /// * `rng` - Random source used by EASY
    ///
    /// # Returns
    /// * `Direction` - Always a direction; the current heading when no move is safe
    pub fn get_move<R: Rng>(
        &self,
        bot: &Snake,
        opponent: Option<&Snake>,
        food: Point,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Direction {
        let grid_size = self.config.board.grid_size;
        let head = match bot.head() {
            Some(head) if head.in_bounds(grid_size) => head,
            _ => {
                debug!("Snake {}: head missing or off the board, keeping heading", bot.id);
                return bot.direction;
            }
        };

        let obstacles = Obstacles::from_snakes(grid_size, std::iter::once(bot).chain(opponent));
        let safe_moves = Self::generate_safe_moves(head, bot.direction, &obstacles);

        if safe_moves.is_empty() {
            debug!(
                "Snake {}: no safe move from {:?}, keeping {}",
                bot.id,
                head,
                bot.direction.as_str()
            );
            return bot.direction;
        }

        match difficulty {
            Difficulty::Easy => {
                if rng.random::<f64>() < self.config.bot.easy_random_move_chance {
                    let pick = safe_moves.choose(rng).copied().unwrap_or(bot.direction);
                    debug!("Snake {}: wandering {}", bot.id, pick.as_str());
                    pick
                } else {
                    Self::choose_move_towards_food(head, food, &safe_moves).unwrap_or(bot.direction)
                }
            }
            Difficulty::Medium => {
                Self::choose_move_towards_food(head, food, &safe_moves).unwrap_or(bot.direction)
            }
            Difficulty::Hard => self.choose_hard_move(bot, head, food, &safe_moves, &obstacles),
        }
    }

    /// Candidate moves minus the 180° reversal, filtered by safety
    pub fn generate_safe_moves(
        head: Point,
        current: Direction,
        obstacles: &Obstacles,
    ) -> Vec<Direction> {
        Direction::all()
            .iter()
            .filter(|&&dir| !dir.is_opposite(current))
            .filter(|&&dir| obstacles.is_safe(&dir.apply(&head)))
            .copied()
            .collect()
    }

    /// Greedy heuristic: the safe move that lands closest to the food.
    /// `min_by_key` keeps the first minimum, so ties follow enumeration order.
    /// `None` only for an empty candidate list.
    fn choose_move_towards_food(
        head: Point,
        food: Point,
        safe_moves: &[Direction],
    ) -> Option<Direction> {
        safe_moves
            .iter()
            .min_by_key(|&&dir| dir.apply(&head).manhattan(&food))
            .copied()
    }

    /// Follows the shortest path to food when its first step leaves some room,
    /// otherwise maximizes reachable space
    fn choose_hard_move(
        &self,
        bot: &Snake,
        head: Point,
        food: Point,
        safe_moves: &[Direction],
        obstacles: &Obstacles,
    ) -> Direction {
        let bot_config = &self.config.bot;
        let snake_id = bot.id;

        // A one-segment snake has no neck, so the search may start with a reversal
        let path_move = Self::shortest_path_first_move(head, food, obstacles)
            .filter(|dir| safe_moves.contains(dir));

        if let Some(first_move) = path_move {
            let next = first_move.apply(&head);
            let space = Self::accessible_space(next, obstacles, bot_config.path_space_cap);
            if space > bot_config.path_space_threshold {
                debug!(
                    "Snake {}: following path {} (space {})",
                    snake_id,
                    first_move.as_str(),
                    space
                );
                return first_move;
            }
            debug!(
                "Snake {}: path {} leads into a pocket (space {}), surviving instead",
                snake_id,
                first_move.as_str(),
                space
            );
        }

        // Strict comparison keeps the first candidate on ties
        let mut best: Option<(Direction, usize)> = None;
        for &dir in safe_moves {
            let space =
                Self::accessible_space(dir.apply(&head), obstacles, bot_config.survival_space_cap);
            if best.map_or(true, |(_, max_space)| space > max_space) {
                best = Some((dir, space));
            }
        }

        match best {
            Some((dir, space)) => {
                debug!(
                    "Snake {}: survival move {} (space {})",
                    snake_id,
                    dir.as_str(),
                    space
                );
                dir
            }
            None => bot.direction,
        }
    }

    /// Breadth-first search from `start` to `target`
    ///
    /// Each safe neighbour of `start` seeds a branch tagged with the move that produced it.
    /// The visited set is shared by all branches, so whichever branch reaches a cell first
    /// owns it and equal-length ties resolve in Up, Down, Left, Right order.
    ///
    /// # Returns
    /// * `Option<Direction>` - The first move of a shortest path, or `None` if the target is unreachable
    pub fn shortest_path_first_move(
        start: Point,
        target: Point,
        obstacles: &Obstacles,
    ) -> Option<Direction> {
        let mut queue: VecDeque<(Point, Direction)> = VecDeque::new();
        let mut visited: HashSet<Point> = HashSet::new();

        for dir in Direction::all().iter() {
            let next = dir.apply(&start);
            if obstacles.is_safe(&next) && visited.insert(next) {
                queue.push_back((next, *dir));
            }
        }

        while let Some((pos, first_move)) = queue.pop_front() {
            if pos == target {
                return Some(first_move);
            }

            for dir in Direction::all().iter() {
                let next = dir.apply(&pos);
                if obstacles.is_safe(&next) && visited.insert(next) {
                    queue.push_back((next, first_move));
                }
            }
        }

        None
    }

    /// Bounded flood fill
    ///
    /// Counts cells reached breadth-first from `start`, stopping once the count reaches `cap`.
    /// The start cell is assumed safe and counts as the first cell, so a fully enclosed start
    /// returns 1 and an open board returns exactly `cap`.
    pub fn accessible_space(start: Point, obstacles: &Obstacles, cap: usize) -> usize {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        queue.push_back(start);
        visited.insert(start);
        let mut count = 0;

        while count < cap {
            let current = match queue.pop_front() {
                Some(current) => current,
                None => break,
            };
            count += 1;

            for dir in Direction::all().iter() {
                let next = dir.apply(&current);
                if obstacles.is_safe(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        count
    }
}
