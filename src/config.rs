use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coord, Point};

/// Largest accepted grid side. Keeps every index and the drawn frame in `u16`.
pub const MAX_GRID_SIZE: Coord = 255;

/// Errors raised while building or validating a game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(Coord),
    #[error("grid size must be at most {max}, got {0}", max = MAX_GRID_SIZE)]
    GridTooLarge(Coord),
    #[error("initial snake length must be between 1 and {grid_size}, got {len}")]
    InitialLength { len: usize, grid_size: Coord },
    #[error("tick period must be at least 1 ms")]
    ZeroTick,
    #[error("snake must have at least one segment")]
    EmptySnake,
    #[error("cell {cell} lies outside the {size}x{size} grid")]
    OutOfBounds { cell: Point, size: Coord },
    #[error("snake overlaps itself at {0}")]
    SelfOverlap(Point),
    #[error("food at {0} is on the snake")]
    FoodOnSnake(Point),
    #[error("heading points back into the neck")]
    ReversedHeading,
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells.
    pub grid_size: Coord,
    /// Initial snake length (>= 1)
    pub initial_len: usize,
    /// Period between ticks. Only the front end reads this; the engine never times itself.
    pub tick_millis: u64,
    /// Fixed RNG seed for reproducible food placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            initial_len: 3,
            tick_millis: 150,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_grid_size(grid_size: Coord) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_board()?;
        if self.initial_len == 0 || self.initial_len > self.grid_size as usize {
            return Err(ConfigError::InitialLength {
                len: self.initial_len,
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }

    /// Checks everything except the opening snake, which explicit layouts replace.
    pub fn validate_board(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    pub fn contains(&self, p: Point) -> bool {
        (0..self.grid_size).contains(&p.x) && (0..self.grid_size).contains(&p.y)
    }

    pub fn cell_count(&self) -> usize {
        (self.grid_size.max(0) as usize).pow(2)
    }

    /// Head of the starting snake. The body extends leftwards from here.
    pub fn initial_head(&self) -> Point {
        let third = self.grid_size / 3;
        let min_x = self.initial_len.saturating_sub(1) as Coord;
        Point::new(third.max(min_x), third)
    }

    /// Parse and validate a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
