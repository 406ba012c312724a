//! Protocol-level errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    /// The stream ended while a message still had bytes left to read.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(io::Error),

    #[error("{}", unknown_packet_message(.id, .previous))]
    UnknownPacketId { id: u8, previous: Option<u8> },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<io::Error> for ProtoError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ProtoError::UnexpectedEof
        } else {
            ProtoError::Io(e)
        }
    }
}

fn unknown_packet_message(id: &u8, previous: &Option<u8>) -> String {
    match previous {
        Some(prev) => format!("Unable to handle packet 0x{id:02x} after 0x{prev:02x}"),
        None => format!("Unable to handle packet 0x{id:02x} (first packet)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_maps_to_unexpected_eof() {
        let err: ProtoError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, ProtoError::UnexpectedEof));
    }

    #[test]
    fn other_io_errors_are_kept() {
        let err: ProtoError = io::Error::new(io::ErrorKind::ConnectionReset, "reset").into();
        match err {
            ProtoError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn unknown_packet_names_both_ids() {
        let err = ProtoError::UnknownPacketId {
            id: 0x99,
            previous: Some(0x0d),
        };
        assert_eq!(err.to_string(), "Unable to handle packet 0x99 after 0x0d");
    }
}
