//! Tunnel lifecycle: connect, receive loop, reconnect policy and death.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use mc_tunnel_proto::packets::{id, Disconnect, Handshake};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::connector::Connector;
use crate::controller::Controller;
use crate::error::{TunnelError, TunnelExit};
use crate::position::Position;
use crate::session::{send_position, Session, SessionState};
use crate::writer::PacketWriter;

/// Reason sent to the server on logout.
const LOGOUT_REASON: &str = "quitting";

/// Construction-time settings of one tunnel.
#[derive(Debug, Clone)]
pub struct TunnelOptions {
    /// Display name sent in the handshake.
    pub name: String,
    pub protocol_version: u8,
    pub handshake_host: String,
    pub port: u16,
    /// Clean up the player file when the tunnel dies.
    pub trashdat: bool,
    pub player_file: PathBuf,
}

/// State shared between the receive task and every [`TunnelHandle`].
pub struct Shared {
    pub(crate) name: String,
    /// The write lock. Held for the whole compose-and-flush of a packet.
    pub(crate) writer: tokio::sync::Mutex<PacketWriter>,
    position: Mutex<Position>,
    state: watch::Sender<SessionState>,
    connected: AtomicBool,
    expect_disconnect: AtomicBool,
    /// Flipped to `true` by logout to stop the receive task.
    shutdown: watch::Sender<bool>,
    /// Zero until the server assigns one.
    pub(crate) entity_id: AtomicI32,
}

impl Shared {
    pub(crate) fn with_position<T>(&self, f: impl FnOnce(&mut Position) -> T) -> T {
        let mut position = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut position)
    }

    pub(crate) fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

/// A running tunnel's receive task.
pub struct Tunnel<C: Connector> {
    options: TunnelOptions,
    connector: C,
    controller: Option<Arc<dyn Controller>>,
    shared: Arc<Shared>,
    session: Session,
    shutdown: watch::Receiver<bool>,
    got_first_packet: bool,
    reconnect_attempted: bool,
}

impl<C: Connector> Tunnel<C> {
    /// Connect, send the handshake and start the receive task.
    ///
    /// Fails only if the first connection cannot be opened. Everything after
    /// that is reported through the returned task's [`TunnelExit`].
    pub async fn spawn(
        options: TunnelOptions,
        connector: C,
        controller: Option<Arc<dyn Controller>>,
    ) -> Result<(TunnelHandle, JoinHandle<TunnelExit>), TunnelError> {
        let local = controller.as_ref().and_then(|c| c.next_local_address());
        let (reader, writer) = connector.connect(local).await?;

        let (state, state_rx) = watch::channel(SessionState::Disconnected);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let shared = Arc::new(Shared {
            name: options.name.clone(),
            writer: tokio::sync::Mutex::new(PacketWriter::new(writer)),
            position: Mutex::new(Position::default()),
            state,
            connected: AtomicBool::new(true),
            expect_disconnect: AtomicBool::new(false),
            shutdown,
            entity_id: AtomicI32::new(0),
        });

        let mut tunnel = Self {
            options,
            connector,
            controller,
            shared: shared.clone(),
            session: Session::new(reader),
            shutdown: shutdown_rx,
            got_first_packet: false,
            reconnect_attempted: false,
        };
        tunnel.send_handshake().await?;
        info!("Bot {} connected", tunnel.options.name);

        let handle = TunnelHandle {
            shared,
            state: state_rx,
        };
        let task = tokio::spawn(tunnel.run());
        Ok((handle, task))
    }

    async fn run(mut self) -> TunnelExit {
        let mut exit = self.receive_loop().await;
        // Whatever the server did after a logout, the logout decides the outcome.
        if self.shared.expect_disconnect.load(Ordering::Acquire) {
            exit = TunnelExit::LoggedOut;
        }
        self.die(&exit);
        exit
    }

    async fn receive_loop(&mut self) -> TunnelExit {
        while self.shared.connected.load(Ordering::Acquire) {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.changed() => return TunnelExit::LoggedOut,
                next = self.session.next_packet() => next,
            };
            let result = match next {
                Ok(packet) => self.session.handle(&self.shared, packet).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(Some(exit)) => return exit,
                Ok(None) => self.got_first_packet = true,
                Err(_) if self.shared.expect_disconnect.load(Ordering::Acquire) => {
                    return TunnelExit::LoggedOut;
                }
                Err(e) if e.is_transport() && !self.got_first_packet => {
                    if self.reconnect_attempted {
                        return TunnelExit::Failed(TunnelError::ReconnectFailed(Box::new(e)));
                    }
                    self.reconnect_attempted = true;
                    debug!(
                        "Bot {} lost connection before first packet ({e}), reconnecting",
                        self.options.name
                    );
                    if let Err(e) = self.reconnect().await {
                        return TunnelExit::Failed(TunnelError::ReconnectFailed(Box::new(e)));
                    }
                }
                Err(e) => return TunnelExit::Failed(e),
            }
        }
        TunnelExit::LoggedOut
    }

    /// Open a fresh connection and repeat the handshake on it.
    async fn reconnect(&mut self) -> Result<(), TunnelError> {
        let local = self.controller.as_ref().and_then(|c| c.next_local_address());
        let (reader, writer) = self.connector.connect(local).await?;
        self.session = Session::new(reader);
        *self.shared.writer.lock().await = PacketWriter::new(writer);
        self.send_handshake().await
    }

    async fn send_handshake(&mut self) -> Result<(), TunnelError> {
        let handshake = Handshake {
            protocol_version: self.options.protocol_version,
            username: self.options.name.clone(),
            host: self.options.handshake_host.clone(),
            port: self.options.port as i32,
        };
        self.shared
            .writer
            .lock()
            .await
            .send(id::HANDSHAKE, &handshake)
            .await?;
        self.shared.set_state(SessionState::Handshaking);
        Ok(())
    }

    fn die(&self, exit: &TunnelExit) {
        self.shared.connected.store(false, Ordering::Release);
        self.shared.set_state(SessionState::Disconnected);

        if let Some(controller) = &self.controller {
            controller.remove(&self.options.name);
        }
        if self.options.trashdat {
            let file = &self.options.player_file;
            match &self.controller {
                Some(controller) => controller.trash(file),
                None => match std::fs::remove_file(file) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => warn!("Failed to delete {}: {e}", file.display()),
                },
            }
        }

        if matches!(exit, TunnelExit::LoggedOut) {
            debug!("Bot {} logged out", self.options.name);
        } else {
            warn!("Bot {} died ({})", self.options.name, exit.reason());
        }
    }
}

/// Cloneable access to a running tunnel from other tasks.
#[derive(Clone)]
pub struct TunnelHandle {
    shared: Arc<Shared>,
    state: watch::Receiver<SessionState>,
}

impl TunnelHandle {
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Snapshot of the current position.
    pub fn position(&self) -> Position {
        self.shared.with_position(|p| *p)
    }

    pub fn health(&self) -> f32 {
        self.shared.with_position(|p| p.health)
    }

    /// Entity id assigned at first login, kept across a reconnect.
    pub fn entity_id(&self) -> Option<i32> {
        match self.shared.entity_id.load(Ordering::Acquire) {
            0 => None,
            eid => Some(eid),
        }
    }

    /// Wait until the first position has been echoed.
    pub async fn wait_ready(&self) -> Result<(), TunnelError> {
        let mut state = self.state.clone();
        let reached = *state
            .wait_for(|s| matches!(s, SessionState::Ready | SessionState::Disconnected))
            .await
            .map_err(|_| TunnelError::ConnectionClosed)?;
        match reached {
            SessionState::Ready => Ok(()),
            _ => Err(TunnelError::ConnectionClosed),
        }
    }

    pub fn walk(&self, distance: f64) {
        self.shared.with_position(|p| p.walk(distance));
    }

    pub fn ascend(&self, distance: f64) {
        self.shared.with_position(|p| p.ascend(distance));
    }

    /// Tell the server where the player is now.
    pub async fn send_position(&self) -> Result<(), TunnelError> {
        let packet = self.shared.with_position(|p| p.to_packet());
        send_position(&self.shared, &packet).await
    }

    /// Leave the server: send the disconnect, close the socket and stop the
    /// receive task. The task then ends with [`TunnelExit::LoggedOut`].
    pub async fn logout(&self) -> Result<(), TunnelError> {
        self.shared.expect_disconnect.store(true, Ordering::Release);
        self.shared.connected.store(false, Ordering::Release);
        info!("Bot {} logging out", self.shared.name);

        let disconnect = Disconnect {
            reason: LOGOUT_REASON.into(),
        };
        let sent = {
            let mut writer = self.shared.writer.lock().await;
            match writer.send(id::DISCONNECT, &disconnect).await {
                Ok(()) => writer.shutdown().await,
                Err(e) => Err(e),
            }
        };
        self.shared.shutdown.send_replace(true);
        sent.map_err(TunnelError::from)
    }
}
