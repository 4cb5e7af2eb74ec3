//! # Bomb Arena Server Library
//!
//! This library provides the telnet front end for the bomb arena. It owns
//! the single authoritative [`game::Board`] of a session, turns keystrokes
//! from connected players into pawn commands, and regularly pushes a text
//! rendering of the board to every player.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! The board lives inside the session loop and nothing else touches it.
//! Player input and clock ticks are handled one at a time, so every chain
//! reaction triggered by a command or an expiring fuse completes before the
//! next event is looked at.
//!
//! ### Client Management
//! Handles the lifecycle of client connections:
//! - Connection acceptance, naming (A-Z) and pawn placement
//! - Input decoding and command application
//! - Disconnection handling and pawn removal
//! - Capacity limits
//!
//! ### Frame Broadcasting
//! Every tick the board clock is advanced by the real elapsed time and a
//! fresh frame is queued for every connected client.
//!
//! ## Module Organization
//!
//! ### Client Manager Module (`client_manager`)
//! Connected clients, the pawn each one controls, and frame fan-out.
//!
//! ### Config Module (`config`)
//! Command-line flags for the listener, board size, tick rate and game
//! tunables.
//!
//! ### Network Module (`network`)
//! TCP listener, per-connection reader/writer tasks and the session loop.
//!
//! ### Protocol Module (`protocol`)
//! Telnet option negotiation and the `w`/`a`/`s`/`d`/`e` key mapping.
//!
//! ### Render Module (`render`)
//! Text frames: one glyph per tile inside a `+--+` border.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Listen on 127.0.0.1:8900 with an 11x11 board, redrawing 5 times a second
//!     let config = ServerConfig::parse_from(["server"]);
//!     let mut server = Server::new(config).await?;
//!
//!     // Players join with `telnet 127.0.0.1 8900`
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod network;
pub mod protocol;
pub mod render;
