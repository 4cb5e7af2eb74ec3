use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::grid::{Coord, TileKind};
use crate::pawn::PawnId;

/// State changes published by the board, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    PawnInserted { pawn: PawnId, coord: Coord },
    PawnMoved { pawn: PawnId, coord: Coord },
    PawnKilled { pawn: PawnId, coord: Coord },
    PawnRemoved { pawn: PawnId },
    BombDropped { coord: Coord, owner: Option<PawnId> },
    BombDetonated { coord: Coord, owner: Option<PawnId> },
    FireStarted { coord: Coord },
    FireExtended { coord: Coord },
    FireStopped { coord: Coord },
    TileChanged { coord: Coord, kind: TileKind },
}

/// Fan-out of board events to external subscribers.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<BoardEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<BoardEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber and forgets closed ones.
    pub fn publish(&mut self, event: &BoardEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }
}
