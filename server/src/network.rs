//! Server network layer handling telnet connections and the session loop

use crate::client_manager::{ClientManager, FRAME_BACKLOG};
use crate::config::ServerConfig;
use crate::protocol::{Command, InputDecoder, NEGOTIATION};
use crate::render;
use game::{Board, Coord, Pawn, PawnId};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Where every new pawn enters the board
pub const SPAWN: Coord = Coord::new(0, 0);

/// Messages sent from network tasks to the session loop
#[derive(Debug)]
pub enum ServerMessage {
    Connection {
        stream: TcpStream,
        addr: SocketAddr,
    },
    Commands {
        client_id: u32,
        commands: Vec<Command>,
    },
    Disconnected {
        client_id: u32,
    },
    Shutdown,
}

/// Runs one command for a pawn. Rejections are part of normal play and are
/// not reported back to the player.
pub fn apply_command(board: &mut Board, pawn: PawnId, command: Command) {
    let result = match command {
        Command::Move(direction) => board.move_pawn(pawn, direction).map(|_| ()),
        Command::DropBomb => board.drop_pawn_bomb(pawn).map(|_| ()),
    };
    if let Err(e) = result {
        debug!("Ignored {:?} from {}: {}", command, pawn, e);
    }
}

/// Reads keystrokes from one connection until it closes.
pub async fn read_commands<R: AsyncRead + Unpin>(
    client_id: u32,
    mut reader: R,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
) {
    let mut decoder = InputDecoder::new();
    let mut buffer = [0u8; 512];

    loop {
        match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(len) => {
                let commands = decoder.feed(&buffer[..len]);
                if commands.is_empty() {
                    continue;
                }
                if server_tx
                    .send(ServerMessage::Commands {
                        client_id,
                        commands,
                    })
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                warn!("Error reading from client {}: {}", client_id, e);
                break;
            }
        }
    }

    let _ = server_tx.send(ServerMessage::Disconnected { client_id });
}

/// Negotiates character mode, then writes frames until the client is dropped.
pub async fn write_frames<W: AsyncWrite + Unpin>(
    client_id: u32,
    mut writer: W,
    mut frames: mpsc::Receiver<Arc<str>>,
) {
    if let Err(e) = writer.write_all(&NEGOTIATION).await {
        warn!("Failed to negotiate with client {}: {}", client_id, e);
        return;
    }

    while let Some(frame) = frames.recv().await {
        if let Err(e) = writer.write_all(frame.as_bytes()).await {
            debug!("Failed to send frame to client {}: {}", client_id, e);
            break;
        }
    }
}

async fn refuse(mut stream: TcpStream, addr: SocketAddr) {
    info!("Refusing connection from {}: server full", addr);
    if let Err(e) = stream.write_all(b"Server full\r\n").await {
        debug!("Failed to notify {}: {}", addr, e);
    }
}

/// Game server owning the board and every connection's bookkeeping
pub struct Server {
    listener: Option<TcpListener>,
    local_addr: SocketAddr,
    board: Board,
    clients: ClientManager,
    config: ServerConfig,
    tick: u64,
    last_tick: Instant,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        let mut board = Board::with_config(config.game_config());
        board.generate(config.width, config.height);

        let (server_tx, server_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener: Some(listener),
            local_addr,
            board,
            clients: ClientManager::new(config.max_clients),
            config,
            tick: 0,
            last_tick: Instant::now(),
            server_tx,
            server_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Handle for feeding messages to the session loop, e.g. `Shutdown`.
    pub fn sender(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that accepts incoming connections
    fn spawn_acceptor(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        if server_tx
                            .send(ServerMessage::Connection { stream, addr })
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    fn handle_connection(&mut self, stream: TcpStream, addr: SocketAddr) {
        if self.clients.is_full() {
            tokio::spawn(refuse(stream, addr));
            return;
        }
        self.catch_up();

        let name = self.clients.next_name();
        let pawn = Pawn::with_config(name, self.board.config());
        let pawn = match self.board.insert_pawn(SPAWN, pawn) {
            Ok(pawn) => pawn,
            Err(e) => {
                error!("Failed to place pawn for {}: {}", addr, e);
                return;
            }
        };

        let (frames_tx, frames_rx) = mpsc::channel(FRAME_BACKLOG);
        let Some(client_id) = self.clients.add_client(addr, pawn, frames_tx) else {
            self.board.remove_pawn(pawn);
            return;
        };

        let (reader, writer) = stream.into_split();
        tokio::spawn(read_commands(client_id, reader, self.server_tx.clone()));
        tokio::spawn(write_frames(client_id, writer, frames_rx));
    }

    /// Brings the board clock up to real time, running whatever fell due.
    fn catch_up(&mut self) {
        let now = Instant::now();
        self.board.advance(now.duration_since(self.last_tick));
        self.last_tick = now;
    }

    fn handle_commands(&mut self, client_id: u32, commands: Vec<Command>) {
        let Some(pawn) = self.clients.get(client_id).map(|client| client.pawn) else {
            return;
        };
        self.catch_up();
        for command in commands {
            apply_command(&mut self.board, pawn, command);
        }
    }

    fn handle_disconnect(&mut self, client_id: u32) {
        if let Some(client) = self.clients.remove_client(client_id) {
            self.board.remove_pawn(client.pawn);
        }
    }

    fn broadcast_frame(&self) {
        if self.clients.is_empty() {
            return;
        }
        let frame = render::frame(&self.board.snapshot());
        self.clients.broadcast(&frame);
    }

    /// Main session loop: applies player input as it arrives and, every
    /// tick, advances the board clock and broadcasts a frame.
    pub async fn run(&mut self) -> io::Result<()> {
        self.spawn_acceptor();

        let mut tick_interval = interval(self.config.tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::Connection { stream, addr }) => {
                            self.handle_connection(stream, addr);
                        },
                        Some(ServerMessage::Commands { client_id, commands }) => {
                            self.handle_commands(client_id, commands);
                        },
                        Some(ServerMessage::Disconnected { client_id }) => {
                            self.handle_disconnect(client_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = tick_interval.tick() => {
                    self.catch_up();
                    self.tick += 1;
                    self.broadcast_frame();

                    if self.tick % 50 == 0 && !self.clients.is_empty() {
                        debug!(
                            "Tick {}: {} clients, {} bombs, {} fires",
                            self.tick,
                            self.clients.len(),
                            self.board.bombs().count(),
                            self.board.fires().count()
                        );
                    }
                },
            }
        }

        Ok(())
    }
}
