use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashSet, VecDeque};
use std::fmt;

pub mod config;
pub mod render;

pub use config::{ConfigError, GameConfig};
pub use render::{Board, Tile, rasterize_game};

/// Integer coordinate type for grid cells
pub type Coord = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.dx_dy();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step on the grid. y grows downwards.
    #[inline]
    pub fn dx_dy(self) -> (Coord, Coord) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a unit vector back to a direction. Anything else yields `None`.
    pub fn from_dx_dy(dx: Coord, dy: Coord) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Self) -> bool {
        self.reverse() == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Dead,
    /// The snake covers every cell, so no food can be placed.
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBody,
}

/// UI-agnostic result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub ate_food: bool,
    pub collision: Option<Collision>,
    pub status: GameStatus,
    pub score: u32,
}

/// Snapshot of one game. Only [`SnakeEngine`] mutates it; everything else reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    snake: VecDeque<Point>,
    food: Option<Point>,
    dir: Direction,
    status: GameStatus,
    score: u32,
}

impl GameState {
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Current food cell. `None` only after the game is won.
    pub fn food(&self) -> Option<Point> {
        self.food
    }

    /// Head first.
    pub fn snake_segments(&self) -> impl Iterator<Item = &Point> {
        self.snake.iter()
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    pub fn head(&self) -> Point {
        *self.snake.front().expect("snake is non-empty")
    }

    pub fn tail(&self) -> Point {
        *self.snake.back().expect("snake is non-empty")
    }

    pub fn occupies(&self, p: Point) -> bool {
        self.snake.contains(&p)
    }

    fn collides_with_body(&self, p: Point, tail_will_move_off: bool) -> bool {
        // If the tail moves this tick, its cell is free for the head.
        let checked = if tail_will_move_off {
            self.snake.len() - 1
        } else {
            self.snake.len()
        };
        self.snake.iter().take(checked).any(|&s| s == p)
    }
}

/// Owns the game state and advances it one tick at a time.
///
/// The engine does no timing of its own: the caller decides when to
/// [`step`](Self::step) and stops calling once the game is over.
#[derive(Debug)]
pub struct SnakeEngine {
    cfg: GameConfig,
    state: GameState,
    /// Applied at the start of the next tick.
    pending_dir: Option<Direction>,
    rng: ChaCha8Rng,
}

impl SnakeEngine {
    /// Create a new game, seeded from `cfg.seed` when set and from the OS otherwise.
    pub fn new(cfg: GameConfig) -> Result<Self, ConfigError> {
        let rng = match cfg.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::with_rng(cfg, rng)
    }

    pub fn with_seed(cfg: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(cfg, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(cfg: GameConfig, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut engine = Self {
            cfg,
            state: GameState {
                snake: VecDeque::new(),
                food: None,
                dir: Direction::Right,
                status: GameStatus::Running,
                score: 0,
            },
            pending_dir: None,
            rng,
        };
        engine.reset();
        Ok(engine)
    }

    /// Start from an explicit layout instead of the standard opening.
    ///
    /// `snake` is head first. `seed` drives every later food placement.
    /// `cfg.initial_len` is not checked here; it only matters on [`reset`](Self::reset).
    pub fn with_layout(
        cfg: GameConfig,
        snake: impl IntoIterator<Item = Point>,
        dir: Direction,
        food: Point,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        cfg.validate_board()?;
        let snake: VecDeque<Point> = snake.into_iter().collect();
        if snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        let mut seen = HashSet::with_capacity(snake.len());
        for &cell in snake.iter().chain(std::iter::once(&food)) {
            if !cfg.contains(cell) {
                return Err(ConfigError::OutOfBounds {
                    cell,
                    size: cfg.grid_size,
                });
            }
        }
        for &cell in &snake {
            if !seen.insert(cell) {
                return Err(ConfigError::SelfOverlap(cell));
            }
        }
        if seen.contains(&food) {
            return Err(ConfigError::FoodOnSnake(food));
        }
        if snake.get(1) == Some(&snake[0].offset(dir)) {
            return Err(ConfigError::ReversedHeading);
        }

        Ok(Self {
            cfg,
            state: GameState {
                snake,
                food: Some(food),
                dir,
                status: GameStatus::Running,
                score: 0,
            },
            pending_dir: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_dir
    }

    /// Request a direction change, applied on the next tick.
    /// A 180° reversal of the current heading is ignored, as is any
    /// request once the game is over.
    pub fn set_direction(&mut self, dir: Direction) {
        if !self.state.is_alive() || dir.is_opposite(self.state.dir) {
            return;
        }
        self.pending_dir = Some(dir);
    }

    /// Same as [`set_direction`](Self::set_direction) for a raw vector.
    /// Non-unit vectors are ignored.
    pub fn set_direction_dx_dy(&mut self, dx: Coord, dy: Coord) {
        if let Some(dir) = Direction::from_dx_dy(dx, dy) {
            self.set_direction(dir);
        }
    }

    /// Resets snake, direction, food, status, and score.
    pub fn reset(&mut self) -> &GameState {
        let head = self.cfg.initial_head();
        self.state.snake = (0..self.cfg.initial_len as Coord)
            .map(|i| Point::new(head.x - i, head.y))
            .collect();
        self.state.dir = Direction::Right;
        self.state.status = GameStatus::Running;
        self.state.score = 0;
        self.pending_dir = None;
        self.state.food = self.spawn_food();
        if self.state.food.is_none() {
            self.state.status = GameStatus::Won;
        }
        info!(
            "new game on {0}x{0} grid, snake length {1}",
            self.cfg.grid_size, self.cfg.initial_len
        );
        &self.state
    }

    /// Advance the game by one tick. Does nothing once the game is over.
    pub fn step(&mut self) -> TickResult {
        if !self.state.is_alive() {
            return self.report(false, None);
        }

        if let Some(next) = self.pending_dir.take() {
            if !next.is_opposite(self.state.dir) {
                self.state.dir = next;
            }
        }

        let next_head = self.state.head().offset(self.state.dir);

        if !self.cfg.contains(next_head) {
            return self.collide(Collision::Wall, next_head);
        }

        let is_eating = self.state.food == Some(next_head);
        if self.state.collides_with_body(next_head, !is_eating) {
            return self.collide(Collision::SelfBody, next_head);
        }

        self.state.snake.push_front(next_head);

        if is_eating {
            self.state.score += 1;
            self.state.food = self.spawn_food();
            match self.state.food {
                Some(food) => debug!("ate food at {next_head}, next food at {food}"),
                None => {
                    self.state.status = GameStatus::Won;
                    info!("grid full, game won with score {}", self.state.score);
                }
            }
        } else {
            self.state.snake.pop_back();
        }

        self.report(is_eating, None)
    }

    fn collide(&mut self, collision: Collision, at: Point) -> TickResult {
        self.state.status = GameStatus::Dead;
        info!(
            "{collision:?} collision at {at}, final score {}",
            self.state.score
        );
        self.report(false, Some(collision))
    }

    fn report(&self, ate_food: bool, collision: Option<Collision>) -> TickResult {
        TickResult {
            ate_food,
            collision,
            status: self.state.status,
            score: self.state.score,
        }
    }

    /// Uniform over free cells, or `None` when the snake fills the grid.
    fn spawn_food(&mut self) -> Option<Point> {
        let size = self.cfg.grid_size;
        let occupied: HashSet<Point> = self.state.snake.iter().copied().collect();
        if occupied.len() >= self.cfg.cell_count() {
            return None;
        }

        let max_attempts = self.cfg.cell_count().saturating_mul(2).max(8);
        for _ in 0..max_attempts {
            let p = Point::new(
                self.rng.random_range(0..size),
                self.rng.random_range(0..size),
            );
            if !occupied.contains(&p) {
                return Some(p);
            }
        }

        // Crowded grid: draw directly from the free cells instead.
        let free: Vec<Point> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Point::new(x, y)))
            .filter(|p| !occupied.contains(p))
            .collect();
        let idx = self.rng.random_range(0..free.len());
        Some(free[idx])
    }
}
