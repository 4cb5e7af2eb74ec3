use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables applied before play begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// How long a tile burns after a bomb ignites it.
    pub burn: Duration,
    /// Fuse given to newly created pawns.
    pub fuse: Duration,
    /// Tiles per direction reached by a new pawn's bombs.
    pub blast_radius: u32,
    /// Bombs a new pawn may have on the board at once.
    pub bomb_capacity: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            burn: Duration::from_secs(1),
            fuse: Duration::from_secs(2),
            blast_radius: 1,
            bomb_capacity: 1,
        }
    }
}
