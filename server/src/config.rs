//! Command-line configuration for the arena server

use clap::Parser;
use game::GameConfig;
use std::time::Duration;

/// Largest board side accepted on the command line
pub const MAX_BOARD_SIDE: i64 = 256;

/// Parses a positive number of seconds such as `2` or `0.5`.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f32 = value
        .parse()
        .map_err(|e| format!("invalid number of seconds: {}", e))?;
    Duration::try_from_secs_f32(secs).map_err(|e| e.to_string())
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Multiplayer bomb arena over telnet")]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8900")]
    pub port: u16,

    /// Board width in tiles
    #[arg(long, default_value = "11", value_parser = clap::value_parser!(u32).range(1..=MAX_BOARD_SIDE))]
    pub width: u32,

    /// Board height in tiles
    #[arg(long, default_value = "11", value_parser = clap::value_parser!(u32).range(1..=MAX_BOARD_SIDE))]
    pub height: u32,

    /// Frames broadcast per second
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    pub tick_rate: u32,

    /// Seconds a tile burns after an explosion
    #[arg(long, default_value = "1", value_parser = parse_seconds)]
    pub burn: Duration,

    /// Seconds between dropping a bomb and its explosion
    #[arg(long, default_value = "2", value_parser = parse_seconds)]
    pub fuse: Duration,

    /// Tiles reached by an explosion in each direction
    #[arg(long, default_value = "1")]
    pub blast_radius: u32,

    /// Bombs each player may have on the board at once
    #[arg(long, default_value = "1")]
    pub bomb_capacity: u32,

    /// Maximum number of simultaneous players
    #[arg(long, default_value = "26")]
    pub max_clients: usize,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            burn: self.burn,
            fuse: self.fuse,
            blast_radius: self.blast_radius,
            bomb_capacity: self.bomb_capacity,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::parse_from(["server"])
    }
}
