// Integration tests for the game loop
//
// Drives the loop with a hand-advanced clock:
// - ticks fire only once the elapsed time exceeds the tick interval
// - pause/resume re-anchor the clock instead of replaying the pause
// - input is buffered only while playing, for live human snakes
// - game over bookkeeping: final event, outcome, high score persistence

use neon_snake::config::Config;
use neon_snake::game_loop::GameLoop;
use neon_snake::store::{MemoryStore, ScoreStore};
use neon_snake::types::{Difficulty, Direction, GameEvent, GameMode, GameStatus, Outcome, Point};
use rand::rngs::StdRng;
use rand::SeedableRng;

const KEY: &str = "snake_highscore";

fn new_loop() -> GameLoop<MemoryStore> {
    GameLoop::new(Config::default_hardcoded(), MemoryStore::new())
}

/// Test: nothing happens before the first game
#[test]
fn test_menu_does_not_tick() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(game.status(), GameStatus::Menu);
    assert!(game.state().is_none());
    assert!(game.update(10_000, &mut rng).is_none());
    assert!(!game.set_direction(1, Direction::Left));
}

/// Test: a tick fires only when elapsed time is strictly greater than the interval
#[test]
fn test_tick_fires_after_interval() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(2);

    game.start(GameMode::PlayerVsBot, Difficulty::Medium, 1_000, &mut rng);
    assert_eq!(game.status(), GameStatus::Playing);

    assert!(game.update(1_050, &mut rng).is_none());
    assert!(game.update(1_100, &mut rng).is_none(), "Exactly one interval is not enough");

    let report = game.update(1_101, &mut rng).expect("tick should fire");
    assert_eq!(report.state.turn, 1);
    assert_eq!(report.state.snakes[0].head(), Some(Point::new(5, 14)));

    // Baseline moved to 1_101
    assert!(game.update(1_150, &mut rng).is_none());
    assert!(game.update(1_202, &mut rng).is_some());
    assert_eq!(game.state().map(|s| s.turn), Some(2));
}

/// Test: paused games do not tick, and resuming does not burst through missed ticks
#[test]
fn test_pause_and_resume() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(3);

    game.start(GameMode::SinglePlayer, Difficulty::Medium, 0, &mut rng);
    game.pause();
    assert_eq!(game.status(), GameStatus::Paused);
    assert!(game.update(5_000, &mut rng).is_none());
    assert!(!game.set_direction(1, Direction::Left), "Input is ignored while paused");

    game.resume(10_000);
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.update(10_050, &mut rng).is_none());
    assert!(game.update(10_101, &mut rng).is_some());
    assert_eq!(game.state().map(|s| s.turn), Some(1));

    game.toggle_pause(10_200);
    assert_eq!(game.status(), GameStatus::Paused);
    game.toggle_pause(20_000);
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.update(20_050, &mut rng).is_none());
}

/// Test: only live human snakes accept input, and the last request before a tick wins
#[test]
fn test_set_direction_rules() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(4);

    game.start(GameMode::PlayerVsBot, Difficulty::Medium, 0, &mut rng);

    assert!(!game.set_direction(2, Direction::Left), "Bot snakes ignore input");
    assert!(!game.set_direction(99, Direction::Left), "Unknown snake");

    assert!(game.set_direction(1, Direction::Left));
    assert!(game.set_direction(1, Direction::Right));

    let report = game.update(101, &mut rng).expect("tick should fire");
    let human = &report.state.snakes[0];
    assert_eq!(human.direction, Direction::Right);
    assert_eq!(human.head(), Some(Point::new(6, 15)));
}

/// Test: losing to the bot ends with GAME_OVER and leaves the high score alone
#[test]
fn test_versus_loss() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(5);

    game.start(GameMode::PlayerVsBot, Difficulty::Medium, 0, &mut rng);

    // Turning left from the spawn runs straight into the player's own neck
    assert!(game.set_direction(1, Direction::Left));
    let report = game.update(101, &mut rng).expect("tick should fire");

    assert_eq!(report.outcome, Outcome::Won { winner_id: 2 });
    assert!(report.events.contains(&GameEvent::SnakeDied { snake_id: 1 }));
    assert_eq!(report.events.last(), Some(&GameEvent::GameOver));
    assert!(!report.events.contains(&GameEvent::GameWon));

    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.outcome(), Some(Outcome::Won { winner_id: 2 }));
    assert_eq!(game.high_score(), 0);
    assert_eq!(game.store().get(KEY), None);

    assert!(game.update(10_000, &mut rng).is_none(), "No ticks after game over");
    assert!(!game.set_direction(1, Direction::Up));
}

/// Test: the bot crashing on its first tick hands the player a GAME_WON
#[test]
fn test_versus_win() {
    let mut config = Config::default_hardcoded();
    // Bot spawns boxed into the top-left corner with no safe move
    config.spawn.player_two = vec![
        Point::new(0, 0),
        Point::new(1, 0),
        Point::new(1, 1),
        Point::new(0, 1),
    ];
    let mut game = GameLoop::new(config, MemoryStore::new());
    let mut rng = StdRng::seed_from_u64(6);

    game.start(GameMode::PlayerVsBot, Difficulty::Hard, 0, &mut rng);
    let report = game.update(101, &mut rng).expect("tick should fire");

    assert_eq!(report.outcome, Outcome::Won { winner_id: 1 });
    assert_eq!(report.events.last(), Some(&GameEvent::GameWon));
    assert_eq!(game.status(), GameStatus::GameOver);
}

/// Test: a single-player record is persisted and signalled as GAME_WON
#[test]
fn test_single_player_record_is_saved() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(7);
    let mut now = 0;

    game.start(GameMode::SinglePlayer, Difficulty::Medium, now, &mut rng);

    // Chase the first food with the greedy engine, then let the snake run straight into a wall
    let mut last = None;
    for _ in 0..2_000 {
        let (interval, steer) = {
            let state = game.state().expect("game started");
            let human = &state.snakes[0];
            let steer = if human.score == 0 {
                Some(game.resolver().bot().get_move(
                    human,
                    None,
                    state.food,
                    Difficulty::Medium,
                    &mut rng,
                ))
            } else {
                None
            };
            (state.tick_interval_ms, steer)
        };

        if let Some(dir) = steer {
            game.set_direction(1, dir);
        }

        now += interval + 1;
        if let Some(report) = game.update(now, &mut rng) {
            if report.outcome.is_terminal() {
                last = Some(report);
                break;
            }
        }
    }

    let report = last.expect("snake should hit a wall");
    let score = report.state.snakes[0].score;

    assert_eq!(report.outcome, Outcome::Finished);
    assert!(score >= 10, "First food is always reachable for a three-segment snake");
    assert!(report.state.tick_interval_ms < 100, "Eating speeds the game up");
    assert_eq!(report.events.last(), Some(&GameEvent::GameWon));
    assert_eq!(game.high_score(), score);
    assert_eq!(game.store().get(KEY), Some(score.to_string()));

    // Restart resets the speed and the board
    game.restart(now, &mut rng);
    let state = game.state().expect("restarted");
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.outcome(), None);
    assert_eq!(state.turn, 0);
    assert_eq!(state.tick_interval_ms, 100);
    assert_eq!(state.snakes[0].score, 0);
    assert_eq!(game.high_score(), score, "High score survives a restart");
}

/// Test: the stored high score is loaded, and a lower score ends with GAME_OVER
#[test]
fn test_existing_high_score_not_beaten() {
    let store = MemoryStore::new();
    store.set(KEY, "1000").unwrap();
    let mut game = GameLoop::new(Config::default_hardcoded(), store);
    let mut rng = StdRng::seed_from_u64(8);
    assert_eq!(game.high_score(), 1000);

    game.start(GameMode::SinglePlayer, Difficulty::Medium, 0, &mut rng);

    // Heading up from (5,15) leaves the board on the 16th tick
    let mut now = 0;
    let mut last = None;
    for _ in 0..16 {
        now += 1_000;
        last = game.update(now, &mut rng);
    }

    let report = last.expect("tick should fire");
    assert_eq!(report.outcome, Outcome::Finished);
    assert_eq!(report.events.last(), Some(&GameEvent::GameOver));
    assert_eq!(game.high_score(), 1000);
    assert_eq!(game.store().get(KEY), Some("1000".to_string()));
}

/// Test: a corrupt stored value counts as zero
#[test]
fn test_corrupt_high_score_reads_as_zero() {
    let store = MemoryStore::new();
    store.set(KEY, "lots").unwrap();
    let game = GameLoop::new(Config::default_hardcoded(), store);
    assert_eq!(game.high_score(), 0);
}

/// Test: quitting returns to the menu and stops the clock
#[test]
fn test_quit_to_menu() {
    let mut game = new_loop();
    let mut rng = StdRng::seed_from_u64(9);

    game.start(GameMode::SinglePlayer, Difficulty::Easy, 0, &mut rng);
    game.quit();

    assert_eq!(game.status(), GameStatus::Menu);
    assert!(game.update(1_000, &mut rng).is_none());
    assert_eq!(game.mode(), Some(GameMode::SinglePlayer));
    assert_eq!(game.difficulty(), Difficulty::Easy);
}
