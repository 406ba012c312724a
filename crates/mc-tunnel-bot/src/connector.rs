//! Outbound transport.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpSocket, TcpStream};
use tracing::debug;

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Opens a fresh byte stream to the target server for every (re)connect.
pub trait Connector: Send + Sync + 'static {
    fn connect(
        &self,
        local: Option<IpAddr>,
    ) -> impl Future<Output = io::Result<(BoxedReader, BoxedWriter)>> + Send;
}

/// TCP connection to a fixed `host:port`.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    target: String,
}

impl TcpConnector {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            target: format!("{host}:{port}"),
        }
    }

    async fn resolve(&self) -> io::Result<SocketAddr> {
        tokio::net::lookup_host(&self.target)
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{} did not resolve", self.target),
                )
            })
    }
}

async fn connect_from(local: IpAddr, addr: SocketAddr) -> io::Result<TcpStream> {
    let socket = match local {
        IpAddr::V4(_) => TcpSocket::new_v4()?,
        IpAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.bind(SocketAddr::new(local, 0))?;
    socket.connect(addr).await
}

impl Connector for TcpConnector {
    async fn connect(&self, local: Option<IpAddr>) -> io::Result<(BoxedReader, BoxedWriter)> {
        let addr = self.resolve().await?;
        let stream = match local {
            Some(local) => match connect_from(local, addr).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!("Connect from {local} failed ({e}), retrying unbound");
                    TcpStream::connect(addr).await?
                }
            },
            None => TcpStream::connect(addr).await?,
        };
        stream.set_nodelay(true)?;
        debug!("Connected to {addr}");

        let (reader, writer) = stream.into_split();
        Ok((Box::new(reader), Box::new(writer)))
    }
}
