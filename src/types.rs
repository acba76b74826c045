// Core game types shared by the bot engine, the turn resolver and the HTTP surface

use serde::{Deserialize, Serialize};

/// 2D grid coordinate. Valid cells satisfy `0 <= x, y < grid_size`.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Checks whether the point lies on a square board of the given size
    pub fn in_bounds(&self, grid_size: i32) -> bool {
        self.x >= 0 && self.x < grid_size && self.y >= 0 && self.y < grid_size
    }

    /// Manhattan distance between two points
    pub fn manhattan(&self, other: &Point) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

/// The four movement directions. Screen coordinates: `Up` decreases `y`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in enumeration order (also the tie-break order)
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Calculates the neighbouring coordinate when moving in this direction.
    /// Saturates at the `i32` limits, which are always off the board.
    pub fn apply(&self, point: &Point) -> Point {
        match self {
            Direction::Up => Point { x: point.x, y: point.y.saturating_sub(1) },
            Direction::Down => Point { x: point.x, y: point.y.saturating_add(1) },
            Direction::Left => Point { x: point.x.saturating_sub(1), y: point.y },
            Direction::Right => Point { x: point.x.saturating_add(1), y: point.y },
        }
    }

    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Bot strength, selects the strategy mix used by the bot engine
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn parse(s: &str) -> Result<Difficulty, String> {
        match s.trim().to_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }

    /// Whether the engine's choice is a pure function of the board at this level
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// One snake, survival only
    SinglePlayer,
    /// Human snake against one bot snake
    PlayerVsBot,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// A snake on the board. `body[0]` is the head.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: u32,
    pub name: String,
    pub body: Vec<Point>,
    pub direction: Direction,
    /// Buffered input for human snakes; overwritten, never queued
    pub next_direction: Direction,
    pub score: u32,
    pub is_dead: bool,
    pub is_bot: bool,
}

impl Snake {
    pub fn new(id: u32, name: &str, body: Vec<Point>, direction: Direction, is_bot: bool) -> Self {
        Snake {
            id,
            name: name.to_string(),
            body,
            direction,
            next_direction: direction,
            score: 0,
            is_dead: false,
            is_bot,
        }
    }

    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, point: &Point) -> bool {
        self.body.contains(point)
    }
}

/// Discrete signals for the audio collaborator
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    FoodEaten { snake_id: u32 },
    SnakeDied { snake_id: u32 },
    GameWon,
    GameOver,
}

/// Terminal condition after a tick
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Nobody relevant died, play continues
    Ongoing,
    /// Single-player game ended; there is no winner
    Finished,
    /// Every snake died in the same tick
    Draw,
    Won { winner_id: u32 },
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Everything the bot engine needs for one decision
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub bot: Snake,
    #[serde(default)]
    pub opponent: Option<Snake>,
    pub food: Point,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_moves_toward_row_zero() {
        let p = Point::new(5, 15);
        assert_eq!(Direction::Up.apply(&p), Point::new(5, 14));
        assert_eq!(Direction::Down.apply(&p), Point::new(5, 16));
        assert_eq!(Direction::Left.apply(&p), Point::new(4, 15));
        assert_eq!(Direction::Right.apply(&p), Point::new(6, 15));
    }

    #[test]
    fn test_opposites() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_serde_is_lowercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let parsed: Difficulty = serde_json::from_str("\"HARD\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        let mode: GameMode = serde_json::from_str("\"PLAYER_VS_BOT\"").unwrap();
        assert_eq!(mode, GameMode::PlayerVsBot);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("up").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Down").unwrap(), Direction::Down);
        assert_eq!(Direction::parse(" RIGHT ").unwrap(), Direction::Right);
        assert!(Direction::parse("sideways").is_err());
    }

    #[test]
    fn test_apply_saturates_at_coordinate_limits() {
        let edge = Point::new(i32::MAX, i32::MIN);
        assert_eq!(Direction::Right.apply(&edge), edge);
        assert_eq!(Direction::Up.apply(&edge), edge);
        assert!(!Direction::Right.apply(&edge).in_bounds(30));
        assert_eq!(edge.manhattan(&Point::new(i32::MIN, i32::MAX)), u32::MAX);
    }

    #[test]
    fn test_in_bounds() {
        assert!(Point::new(0, 0).in_bounds(30));
        assert!(Point::new(29, 29).in_bounds(30));
        assert!(!Point::new(30, 0).in_bounds(30));
        assert!(!Point::new(0, -1).in_bounds(30));
    }
}
