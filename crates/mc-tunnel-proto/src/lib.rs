//! Minecraft Java Edition (protocol 78) wire types and packet definitions.
//!
//! Decoding is streaming: every reader works directly on an `AsyncRead` and
//! consumes exactly the bytes its message defines.

pub mod codec;
pub mod error;
pub mod item_stack;
pub mod metadata;
pub mod packets;
pub mod types;
