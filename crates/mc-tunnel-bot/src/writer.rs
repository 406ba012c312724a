//! Outbound half of a connection.
//!
//! Callers hold the tunnel's write lock around a `PacketWriter` for the whole
//! compose-and-flush of one packet, so packets never interleave on the wire.

use bytes::{BufMut, BytesMut};
use mc_tunnel_crypto::StreamEncryptor;
use mc_tunnel_proto::codec::ProtoEncode;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::connector::BoxedWriter;

pub struct PacketWriter {
    inner: BoxedWriter,
    encryptor: Option<StreamEncryptor>,
}

impl PacketWriter {
    pub fn new(inner: BoxedWriter) -> Self {
        Self {
            inner,
            encryptor: None,
        }
    }

    /// Encrypt everything written from now on.
    pub fn enable_encryption(&mut self, encryptor: StreamEncryptor) {
        self.encryptor = Some(encryptor);
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryptor.is_some()
    }

    /// Write one packet: the id byte followed by the encoded body.
    pub async fn send<P: ProtoEncode>(&mut self, id: u8, packet: &P) -> std::io::Result<()> {
        self.send_with(id, |buf| packet.proto_encode(buf)).await
    }

    /// Write one packet whose body is produced by `encode`.
    pub async fn send_with<F>(&mut self, id: u8, encode: F) -> std::io::Result<()>
    where
        F: FnOnce(&mut BytesMut),
    {
        let mut frame = BytesMut::with_capacity(64);
        frame.put_u8(id);
        encode(&mut frame);
        trace!("Sending 0x{id:02x} ({} bytes)", frame.len());

        if let Some(encryptor) = self.encryptor.as_mut() {
            encryptor.encrypt(&mut frame);
        }
        self.inner.write_all(&frame).await?;
        self.inner.flush().await
    }

    /// Close the write half. The peer sees end of stream once it has read
    /// everything sent before.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.inner.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_tunnel_crypto::StreamDecryptor;
    use mc_tunnel_proto::packets::{id, KeepAlive};
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn plain_keep_alive() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut writer = PacketWriter::new(Box::new(client));
        writer
            .send(id::KEEP_ALIVE, &KeepAlive { id: 12345 })
            .await
            .unwrap();

        let mut buf = [0u8; 5];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x00, 0x30, 0x39]);
    }

    #[tokio::test]
    async fn encrypted_stream_continues_across_packets() {
        let secret = [5u8; 16];
        let (client, mut server) = tokio::io::duplex(64);
        let mut writer = PacketWriter::new(Box::new(client));
        writer.enable_encryption(StreamEncryptor::new(&secret));
        assert!(writer.is_encrypted());

        writer.send(id::KEEP_ALIVE, &KeepAlive { id: 1 }).await.unwrap();
        writer
            .send_with(id::CLIENT_STATUS, |buf| buf.put_i8(1))
            .await
            .unwrap();

        let mut buf = [0u8; 7];
        server.read_exact(&mut buf).await.unwrap();
        assert_ne!(&buf[..5], &[0, 0, 0, 0, 1]);
        StreamDecryptor::new(&secret).decrypt(&mut buf);
        assert_eq!(buf, [0x00, 0, 0, 0, 1, 0xCD, 1]);
    }

    #[tokio::test]
    async fn shutdown_ends_the_stream() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut writer = PacketWriter::new(Box::new(client));
        writer.send(id::KEEP_ALIVE, &KeepAlive { id: 2 }).await.unwrap();
        writer.shutdown().await.unwrap();

        let mut rest = Vec::new();
        server.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, [0x00, 0, 0, 0, 2]);
    }
}
