//! Tunnel errors and the final outcome of a tunnel's receive task.

use std::io;

use mc_tunnel_crypto::CryptoError;
use mc_tunnel_proto::error::ProtoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TunnelError {
    /// The stream no longer lines up with the packet table.
    #[error("{0}")]
    Decode(ProtoError),

    #[error("Socket closed: {0}")]
    Transport(io::Error),

    #[error("encryption handshake failed: {0}")]
    Handshake(#[from] CryptoError),

    /// The peer closed the stream between two packets.
    #[error("Socket closed")]
    ConnectionClosed,

    #[error("Socket closed on reconnect: {0}")]
    ReconnectFailed(Box<TunnelError>),

    #[error("config error: {0}")]
    Config(String),
}

impl TunnelError {
    /// Whether this is a transport-level failure, the only kind that may be
    /// retried by reconnecting.
    pub fn is_transport(&self) -> bool {
        matches!(self, TunnelError::Transport(_) | TunnelError::ConnectionClosed)
    }
}

impl From<ProtoError> for TunnelError {
    fn from(e: ProtoError) -> Self {
        match e {
            ProtoError::Io(e) => TunnelError::Transport(e),
            other => TunnelError::Decode(other),
        }
    }
}

impl From<io::Error> for TunnelError {
    fn from(e: io::Error) -> Self {
        TunnelError::Transport(e)
    }
}

/// How a tunnel's receive task ended.
#[derive(Debug)]
pub enum TunnelExit {
    /// The local side asked to log out.
    LoggedOut,
    /// The server sent a disconnect packet.
    Kicked(String),
    Failed(TunnelError),
}

impl TunnelExit {
    pub fn reason(&self) -> String {
        match self {
            TunnelExit::LoggedOut => "logged out".into(),
            TunnelExit::Kicked(reason) => reason.clone(),
            TunnelExit::Failed(e) => e.to_string(),
        }
    }
}
