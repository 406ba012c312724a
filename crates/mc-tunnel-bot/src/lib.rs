//! Client-emulating tunnel for a Minecraft 1.6.4 server.
//!
//! A tunnel logs in like a real player, keeps the session alive and tracks
//! the player's position and health while consuming every packet the
//! server sends.

pub mod config;
pub mod connector;
pub mod controller;
pub mod error;
pub mod position;
pub mod session;
pub mod tunnel;
pub mod writer;

pub use config::TunnelConfig;
pub use connector::{Connector, TcpConnector};
pub use controller::{Controller, StandaloneController};
pub use error::{TunnelError, TunnelExit};
pub use position::Position;
pub use session::SessionState;
pub use tunnel::{Tunnel, TunnelHandle, TunnelOptions};
