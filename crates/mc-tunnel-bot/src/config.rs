use serde::Deserialize;
use std::path::{Path, PathBuf};

use mc_tunnel_proto::packets::PROTOCOL_VERSION;

use crate::error::TunnelError;
use crate::tunnel::TunnelOptions;

#[derive(Debug, Deserialize)]
pub struct TunnelConfig {
    pub target: TargetSection,
    pub bot: BotSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct TargetSection {
    pub host: String,
    /// Internal server port. Also sent in the handshake.
    pub port: u16,
    /// Host name announced in the handshake.
    #[serde(default = "default_handshake_host")]
    pub handshake_host: String,
}

fn default_handshake_host() -> String {
    "localhost".into()
}

#[derive(Debug, Deserialize)]
pub struct BotSection {
    pub name: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u8,
    /// Hand the player file to the controller (or delete it) when the bot dies.
    #[serde(default = "default_trashdat")]
    pub trashdat: bool,
    #[serde(default = "default_player_dir")]
    pub player_dir: String,
    #[serde(default)]
    pub local_address_pool: bool,
}

fn default_protocol_version() -> u8 {
    PROTOCOL_VERSION
}

fn default_trashdat() -> bool {
    true
}

fn default_player_dir() -> String {
    "world/players".into()
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl TunnelConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TunnelError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TunnelError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, TunnelError> {
        toml::from_str(contents).map_err(|e| TunnelError::Config(e.to_string()))
    }

    /// Per-player file the server keeps for this bot.
    pub fn player_file(&self) -> PathBuf {
        Path::new(&self.bot.player_dir).join(format!("{}.dat", self.bot.name))
    }

    pub fn tunnel_options(&self) -> TunnelOptions {
        TunnelOptions {
            name: self.bot.name.clone(),
            protocol_version: self.bot.protocol_version,
            handshake_host: self.target.handshake_host.clone(),
            port: self.target.port,
            trashdat: self.bot.trashdat,
            player_file: self.player_file(),
        }
    }
}
