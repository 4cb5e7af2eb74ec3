//! Tile grid: coordinates, directions and the foreground tile layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate. `x` grows to the right, `y` grows downward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate `steps` tiles away in `direction`.
    pub fn offset(self, direction: Direction, steps: i32) -> Coord {
        let (dx, dy) = direction.delta();
        Coord {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
        }
    }

    /// The four orthogonal neighbours, in `Direction::ALL` order.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Direction::ALL.into_iter().map(move |d| self.offset(d, 1))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Foreground tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Passable; fire and pawns may occupy it.
    Empty,
    /// Indestructible pillar. Stops explosions outright.
    Hard,
    /// Destructible block. Stops explosions but is burnt to `Empty`.
    Soft,
}

/// Fixed-size foreground layer stored as a flat row-major array.
///
/// Coordinates outside `width × height` are off-board and have no tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Builds the standard arena: `Hard` where both `x` and `y` are odd,
    /// `Soft` everywhere else.
    pub fn generate(width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                tiles.push(if x % 2 == 1 && y % 2 == 1 {
                    TileKind::Hard
                } else {
                    TileKind::Soft
                });
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y as usize) * (self.width as usize) + coord.x as usize)
    }

    /// Tile at `coord`, or `None` when off-board.
    pub fn get(&self, coord: Coord) -> Option<TileKind> {
        self.index(coord).map(|i| self.tiles[i])
    }

    /// Overwrites the tile at `coord`. Returns the previous kind, or `None`
    /// (and does nothing) when `coord` is off-board.
    pub fn set(&mut self, coord: Coord, kind: TileKind) -> Option<TileKind> {
        let i = self.index(coord)?;
        Some(std::mem::replace(&mut self.tiles[i], kind))
    }

    /// Every on-board coordinate with its tile, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, TileKind)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(i, kind)| {
            let i = i as i32;
            (Coord::new(i % width, i / width), *kind)
        })
    }

    pub(crate) fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }
}
