use thiserror::Error;

use crate::grid::Coord;
use crate::pawn::PawnId;

/// Rejections produced by board and pawn commands.
///
/// None of these are fatal: they are expected outcomes of normal play and
/// leave all state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("pawn is dead")]
    Dead,
    #[error("illegal move: {0}")]
    IllegalMove(&'static str),
    #[error("a bomb is already at {0}")]
    Occupied(Coord),
    #[error("no tile at {0}")]
    NotFound(Coord),
    #[error("unknown pawn {0}")]
    UnknownPawn(PawnId),
}

pub type Result<T> = core::result::Result<T, GameError>;
