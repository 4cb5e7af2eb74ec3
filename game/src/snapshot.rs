use serde::{Deserialize, Serialize};

use crate::board::{Board, Bomb, Fire};
use crate::grid::{Coord, TileKind};
use crate::pawn::PawnId;
use crate::timer::TimerService;

/// Read-only copy of everything needed to draw a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries.
    pub tiles: Vec<TileKind>,
    pub bombs: Vec<Coord>,
    pub fires: Vec<Coord>,
    pub pawns: Vec<PawnView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PawnView {
    pub id: PawnId,
    pub name: String,
    pub alive: bool,
    pub location: Coord,
}

impl Snapshot {
    pub fn tile(&self, coord: Coord) -> Option<TileKind> {
        if coord.x < 0 || coord.y < 0 || coord.x as u32 >= self.width || coord.y as u32 >= self.height
        {
            return None;
        }
        self.tiles
            .get(coord.y as usize * self.width as usize + coord.x as usize)
            .copied()
    }

    /// Compact binary frame for adapters that do not draw text.
    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

impl<T: TimerService> Board<T> {
    pub fn snapshot(&self) -> Snapshot {
        let mut bombs: Vec<Coord> = self.bombs().map(Bomb::coord).collect();
        bombs.sort();
        let mut fires: Vec<Coord> = self.fires().map(Fire::coord).collect();
        fires.sort();

        let pawns = self
            .pawns()
            .filter_map(|(id, pawn)| {
                Some(PawnView {
                    id,
                    name: pawn.name().to_string(),
                    alive: pawn.is_alive(),
                    location: pawn.location()?,
                })
            })
            .collect();

        Snapshot {
            width: self.width(),
            height: self.height(),
            tiles: self.grid().tiles().to_vec(),
            bombs,
            fires,
            pawns,
        }
    }
}
