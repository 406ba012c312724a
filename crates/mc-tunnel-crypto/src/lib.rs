//! Cryptography: RSA shared-secret exchange and AES-128-CFB8 stream ciphers.

pub mod aes;
pub mod key_exchange;

pub use crate::aes::{StreamDecryptor, StreamEncryptor};
pub use key_exchange::{KeyExchange, SHARED_SECRET_LEN};

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("RSA encryption failed: {0}")]
    Encrypt(String),

    #[error("key response received before any key request")]
    MissingKeyRequest,
}
