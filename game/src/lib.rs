//! # Bomb Arena Game Core
//!
//! Grid-based bombing game simulation shared by every front end. Pawns walk
//! a tile grid and drop bombs; bombs explode after a fuse, fire spreads in
//! the four cardinal directions until something stops it, and fire kills
//! whatever pawn or bomb it reaches.
//!
//! ## Module Organization
//!
//! - `grid`: coordinates, directions, tile kinds and arena generation
//! - `board`: the board, its bombs and fires, and the explosion logic
//! - `pawn`: player state and validation of move/drop-bomb commands
//! - `timer`: the timer service the board schedules fuses and burns on
//! - `event`: events published by the board
//! - `snapshot`: read-only board copies for rendering
//!
//! ## Time
//!
//! The board owns a [`TimerService`] instead of reading the wall clock.
//! Whoever drives the session calls [`Board::advance`] with the elapsed time
//! and every fuse or burn that falls due runs, in deadline order, before the
//! call returns. Tests drive the same clock by hand.
//!
//! ```rust
//! use game::{Board, Coord, Direction, Pawn};
//! use std::time::Duration;
//!
//! let mut board = Board::new();
//! board.generate(11, 11);
//! let alice = board.insert_pawn(Coord::new(0, 0), Pawn::new("alice")).unwrap();
//!
//! board.drop_pawn_bomb(alice).unwrap();
//! board.move_pawn(alice, Direction::Right).unwrap();
//! board.move_pawn(alice, Direction::Left).unwrap_err(); // the bomb is in the way
//!
//! board.advance(Duration::from_secs(2));
//! assert!(board.is_burning(Coord::new(0, 0)));
//! assert!(!board.pawn(alice).unwrap().is_alive());
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod pawn;
pub mod snapshot;
pub mod timer;

pub use board::{Board, Bomb, Fire};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use event::BoardEvent;
pub use grid::{Coord, Direction, Grid, TileKind};
pub use pawn::{Pawn, PawnId};
pub use snapshot::{PawnView, Snapshot};
pub use timer::{TimerEvent, TimerId, TimerQueue, TimerService};
