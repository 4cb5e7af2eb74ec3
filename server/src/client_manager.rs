//! Connected player bookkeeping for the arena server
//!
//! This module tracks who is connected and which pawn each connection
//! controls:
//! - Client connection lifecycle (connect, disconnect)
//! - Player naming (one capital letter per connection, cycling A-Z)
//! - Capacity limits
//! - Frame fan-out to every connected client

use game::PawnId;
use log::{debug, info};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Frames queued per client before new ones are dropped
pub const FRAME_BACKLOG: usize = 4;

/// A connected player
#[derive(Debug)]
pub struct Client {
    /// Unique client identifier assigned by the server
    pub id: u32,
    /// Remote address, for logging
    pub addr: SocketAddr,
    /// Pawn this connection controls
    pub pawn: PawnId,
    /// Outgoing frames, drained by the connection's writer task
    pub frames: mpsc::Sender<Arc<str>>,
}

impl Client {
    pub fn new(
        id: u32,
        addr: SocketAddr,
        pawn: PawnId,
        frames: mpsc::Sender<Arc<str>>,
    ) -> Self {
        Self {
            id,
            addr,
            pawn,
            frames,
        }
    }
}

/// Manages all connected clients
pub struct ClientManager {
    /// Connected clients indexed by their unique ID
    clients: HashMap<u32, Client>,
    /// Next available client ID for new connections
    next_client_id: u32,
    /// Connections named so far, for picking the next letter
    names_issued: u32,
    /// Maximum number of concurrent clients allowed
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            names_issued: 0,
            max_clients,
        }
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.max_clients
    }

    /// Name for the next player: `A`, `B`, ... `Z`, then `A` again.
    pub fn next_name(&mut self) -> String {
        let letter = char::from(b'A' + (self.names_issued % 26) as u8);
        self.names_issued += 1;
        letter.to_string()
    }

    /// Registers a connection controlling `pawn`.
    ///
    /// Returns `None` if the server is at capacity.
    pub fn add_client(
        &mut self,
        addr: SocketAddr,
        pawn: PawnId,
        frames: mpsc::Sender<Arc<str>>,
    ) -> Option<u32> {
        if self.is_full() {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {} as {}", client_id, addr, pawn);
        self.clients
            .insert(client_id, Client::new(client_id, addr, pawn, frames));
        Some(client_id)
    }

    /// Removes a client, returning it so the caller can release its pawn.
    pub fn remove_client(&mut self, client_id: u32) -> Option<Client> {
        let client = self.clients.remove(&client_id)?;
        info!("Client {} disconnected", client.id);
        Some(client)
    }

    pub fn get(&self, client_id: u32) -> Option<&Client> {
        self.clients.get(&client_id)
    }

    /// Queues `frame` for every client. A client whose backlog is full
    /// skips this frame.
    pub fn broadcast(&self, frame: &str) {
        let frame: Arc<str> = Arc::from(frame);
        for client in self.clients.values() {
            match client.frames.try_send(Arc::clone(&frame)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!("Client {} is falling behind, frame dropped", client.id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Client {} writer is gone", client.id);
                }
            }
        }
    }

    /// Returns the number of currently connected clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no clients are currently connected
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
