//! End-to-end game scenarios on the classic 15x15 board.

use grid_snake::{Collision, Direction, GameConfig, GameStatus, Point, SnakeEngine};

fn classic_snake() -> [Point; 3] {
    [Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)]
}

fn classic_game(food: Point) -> SnakeEngine {
    SnakeEngine::with_layout(
        GameConfig::default(),
        classic_snake(),
        Direction::Right,
        food,
        2024,
    )
    .unwrap()
}

#[test]
fn default_opening_matches_classic_layout() {
    let game = SnakeEngine::with_seed(GameConfig::default(), 1).unwrap();
    let snake: Vec<Point> = game.state().snake_segments().copied().collect();
    assert_eq!(snake, classic_snake());
    assert_eq!(game.state().direction(), Direction::Right);
    assert!(game.state().is_alive());
}

#[test]
fn five_plain_steps_slide_the_snake() {
    let mut game = classic_game(Point::new(10, 10));
    for _ in 0..5 {
        let res = game.step();
        assert!(!res.ate_food);
        assert_eq!(res.collision, None);
    }
    let state = game.state();
    assert_eq!(state.head(), Point::new(10, 5));
    assert_eq!(state.tail(), Point::new(8, 5));
    assert_eq!(state.snake_len(), 3);
    assert!(state.is_alive());
    assert_eq!(state.score(), 0);
}

#[test]
fn eating_grows_and_respawns_food() {
    let mut game = classic_game(Point::new(6, 5));
    let res = game.step();
    assert!(res.ate_food);
    assert_eq!(res.score, 1);

    let state = game.state();
    assert_eq!(state.head(), Point::new(6, 5));
    assert_eq!(state.snake_len(), 4);
    let food = state.food().expect("food respawned");
    assert!(!state.occupies(food));
    assert!(GameConfig::default().contains(food));
}

#[test]
fn leaving_the_left_edge_ends_the_game() {
    let mut game = SnakeEngine::with_layout(
        GameConfig::default(),
        [Point::new(0, 5), Point::new(1, 5)],
        Direction::Left,
        Point::new(10, 10),
        5,
    )
    .unwrap();
    let res = game.step();
    assert_eq!(res.status, GameStatus::Dead);
    assert_eq!(res.collision, Some(Collision::Wall));
    assert!(!game.state().is_alive());
    assert_eq!(game.state().head(), Point::new(0, 5));
}

#[test]
fn raw_vectors_steer_like_directions() {
    let mut game = classic_game(Point::new(10, 10));
    game.set_direction_dx_dy(-1, 0);
    assert_eq!(game.pending_direction(), None);
    game.set_direction_dx_dy(0, -1);
    game.step();
    assert_eq!(game.state().head(), Point::new(5, 4));
}

#[test]
fn reset_after_game_over_starts_fresh() {
    let mut game = SnakeEngine::with_seed(GameConfig::default(), 8).unwrap();
    game.set_direction(Direction::Up);
    while game.state().is_alive() {
        game.step();
    }
    let state = game.reset();
    assert!(state.is_alive());
    assert_eq!(state.score(), 0);
    assert_eq!(state.head(), Point::new(5, 5));
    let food = state.food().unwrap();
    assert!(!state.occupies(food));
}
