//! Player-controlled pawns and validation of their commands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::grid::{Coord, Direction, TileKind};
use crate::timer::TimerService;

/// Identity of a pawn on a board, assigned by [`Board::insert_pawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PawnId(pub(crate) u32);

impl fmt::Display for PawnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pawn#{}", self.0)
    }
}

/// Per-player state.
///
/// A pawn is created detached and handed to a board, which owns it from
/// then on. Only the board and the pawn's own methods change its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Pawn {
    name: String,
    alive: bool,
    bomb_capacity: u32,
    blast_radius: u32,
    fuse: Duration,
    location: Option<Coord>,
}

impl Pawn {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &GameConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &GameConfig) -> Self {
        Self {
            name: name.into(),
            alive: true,
            bomb_capacity: config.bomb_capacity,
            blast_radius: config.blast_radius,
            fuse: config.fuse,
            location: None,
        }
    }

    pub fn with_fuse(mut self, fuse: Duration) -> Self {
        self.fuse = fuse;
        self
    }

    pub fn with_blast_radius(mut self, blast_radius: u32) -> Self {
        self.blast_radius = blast_radius;
        self
    }

    pub fn with_bomb_capacity(mut self, bomb_capacity: u32) -> Self {
        self.bomb_capacity = bomb_capacity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Bombs currently available to place.
    pub fn bomb_capacity(&self) -> u32 {
        self.bomb_capacity
    }

    pub fn blast_radius(&self) -> u32 {
        self.blast_radius
    }

    pub fn fuse(&self) -> Duration {
        self.fuse
    }

    /// `None` until the pawn is inserted into a board.
    pub fn location(&self) -> Option<Coord> {
        self.location
    }

    pub(crate) fn place(&mut self, coord: Coord) {
        self.location = Some(coord);
    }

    /// Returns `true` if this call is the one that killed the pawn.
    pub(crate) fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    pub(crate) fn take_bomb(&mut self) {
        self.bomb_capacity = self.bomb_capacity.saturating_sub(1);
    }

    pub(crate) fn return_bomb(&mut self) {
        self.bomb_capacity += 1;
    }
}

impl<T: TimerService> Board<T> {
    fn live_pawn(&self, id: PawnId) -> Result<(&Pawn, Coord)> {
        let pawn = self.pawn(id).ok_or(GameError::UnknownPawn(id))?;
        if !pawn.is_alive() {
            return Err(GameError::Dead);
        }
        let location = pawn.location().ok_or(GameError::UnknownPawn(id))?;
        Ok((pawn, location))
    }

    /// Steps a pawn one tile in `direction`. The target must be an on-board
    /// `Empty` tile without a bomb on it.
    pub fn move_pawn(&mut self, id: PawnId, direction: Direction) -> Result<Coord> {
        let (_, from) = self.live_pawn(id)?;
        let target = from.offset(direction, 1);

        match self.fg_tile(target) {
            Err(_) => return Err(GameError::IllegalMove("edge of the board")),
            Ok(TileKind::Empty) => {}
            Ok(_) => return Err(GameError::IllegalMove("wall in the way")),
        }
        if self.has_bomb(target) {
            return Err(GameError::IllegalMove("bomb in the way"));
        }

        self.pawn_moved(id, target)?;
        Ok(target)
    }

    /// Places one of the pawn's bombs under it. The bomb goes back into the
    /// pawn's inventory when it detonates, whatever sets it off.
    pub fn drop_pawn_bomb(&mut self, id: PawnId) -> Result<oneshot::Receiver<()>> {
        let (pawn, location) = self.live_pawn(id)?;
        if pawn.bomb_capacity() == 0 {
            return Err(GameError::IllegalMove("no bombs left"));
        }
        if self.has_bomb(location) {
            return Err(GameError::IllegalMove("bomb already here"));
        }
        let (fuse, blast_radius) = (pawn.fuse(), pawn.blast_radius());

        let detonated = self.place_bomb(location, fuse, blast_radius, Some(id))?;
        if let Some(pawn) = self.pawn_mut(id) {
            pawn.take_bomb();
        }
        Ok(detonated)
    }
}
