use std::sync::Arc;

use mc_tunnel_bot::{
    Controller, StandaloneController, TcpConnector, Tunnel, TunnelConfig, TunnelExit,
};
use tracing::{error, info, warn};

const DEFAULT_CONFIG: &str = "tunnel.toml";
const TRASH_DIR: &str = "trash";

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match TunnelConfig::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "MC-Tunnel v{} connecting {} to {}:{} (protocol {})",
        env!("CARGO_PKG_VERSION"),
        config.bot.name,
        config.target.host,
        config.target.port,
        config.bot.protocol_version
    );

    let controller: Arc<dyn Controller> = Arc::new(StandaloneController::new(
        TRASH_DIR,
        config.bot.local_address_pool,
    ));
    let connector = TcpConnector::new(&config.target.host, config.target.port);

    let (handle, mut task) =
        match Tunnel::spawn(config.tunnel_options(), connector, Some(controller)).await {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to connect: {e}");
                std::process::exit(1);
            }
        };

    let exit = tokio::select! {
        result = &mut task => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            if let Err(e) = handle.logout().await {
                warn!("Logout failed: {e}");
            }
            task.await
        }
    };

    match exit {
        Ok(TunnelExit::LoggedOut) => info!("Tunnel shut down."),
        Ok(TunnelExit::Kicked(reason)) => {
            info!("Kicked: {reason}");
            std::process::exit(1);
        }
        Ok(TunnelExit::Failed(e)) => {
            error!("Tunnel failed: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Tunnel task panicked: {e}");
            std::process::exit(1);
        }
    }
}
