use std::fmt;

use super::{Coord, GameState, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Head,
    Body,
    Food,
}

impl Tile {
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Head => '@',
            Self::Body => 'o',
            Self::Food => '*',
        }
    }
}

/// Square grid of tiles, row-major. Pure projection of a [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub size: Coord,
    pub tiles: Vec<Tile>,
}

impl Board {
    pub fn new(size: Coord) -> Self {
        let side = size.max(0) as usize;
        Self {
            size,
            tiles: vec![Tile::Empty; side * side],
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.size || p.y >= self.size {
            None
        } else {
            Some(p.y as usize * self.size as usize + p.x as usize)
        }
    }

    pub fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = tile;
        }
    }

    pub fn get(&self, p: Point) -> Option<Tile> {
        self.idx(p).map(|i| self.tiles[i])
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.size.max(1) as usize)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .rows()
            .map(|row| row.iter().map(|t| t.symbol()).collect::<String>())
            .collect::<Vec<String>>()
            .join("\n");
        write!(f, "{text}")
    }
}

pub fn rasterize_game(state: &GameState, size: Coord) -> Board {
    let mut board = Board::new(size);
    if let Some(food) = state.food() {
        board.set(food, Tile::Food);
    }
    // Body first so the head always wins its own cell.
    for &p in state.snake_segments().skip(1) {
        board.set(p, Tile::Body);
    }
    board.set(state.head(), Tile::Head);
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, GameConfig, SnakeEngine};

    #[test]
    fn draws_head_body_and_food() {
        let engine = SnakeEngine::with_layout(
            GameConfig::with_grid_size(4),
            [Point::new(2, 1), Point::new(1, 1), Point::new(0, 1)],
            Direction::Right,
            Point::new(3, 3),
            0,
        )
        .unwrap();
        let board = rasterize_game(engine.state(), 4);
        assert_eq!(board.get(Point::new(2, 1)), Some(Tile::Head));
        assert_eq!(board.get(Point::new(0, 1)), Some(Tile::Body));
        assert_eq!(board.get(Point::new(3, 3)), Some(Tile::Food));
        assert_eq!(board.get(Point::new(4, 0)), None);
        assert_eq!(board.to_string(), "....\noo@.\n....\n...*");
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut board = Board::new(2);
        board.set(Point::new(-1, 0), Tile::Food);
        board.set(Point::new(2, 0), Tile::Food);
        assert!(board.tiles.iter().all(|&t| t == Tile::Empty));
        assert_eq!(board.rows().count(), 2);
    }

    #[test]
    fn largest_grid_indexes_far_corner() {
        let size = crate::config::MAX_GRID_SIZE;
        let engine = SnakeEngine::with_layout(
            GameConfig::with_grid_size(size),
            [Point::new(1, 0), Point::new(0, 0)],
            Direction::Right,
            Point::new(0, size - 1),
            0,
        )
        .unwrap();
        let board = rasterize_game(engine.state(), size);
        assert_eq!(board.tiles.len(), (size * size) as usize);
        assert_eq!(board.get(Point::new(0, size - 1)), Some(Tile::Food));
        assert_eq!(board.tiles.last(), Some(&Tile::Empty));
        assert_eq!(board.get(Point::new(size, 0)), None);
    }
}
