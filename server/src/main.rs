use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::network::{Server, ServerMessage};

/// Main-method of the application.
/// Parses command-line arguments, then runs the session loop until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::parse();
    info!(
        "Starting {}x{} arena (fuse {:?}, burn {:?}, blast radius {})",
        config.width, config.height, config.fuse, config.burn, config.blast_radius
    );

    let mut server = Server::new(config).await?;
    info!("Players join with: telnet {}", server.local_addr());

    let shutdown = server.sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down gracefully...");
            let _ = shutdown.send(ServerMessage::Shutdown);
        }
    });

    server.run().await?;

    Ok(())
}
