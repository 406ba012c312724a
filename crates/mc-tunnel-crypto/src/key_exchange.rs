//! Client side of the shared-secret exchange.
//!
//! The server sends its RSA public key (SPKI DER) and a verify token. The
//! client picks a random 16-byte secret and returns both the secret and the
//! token encrypted under the server key with PKCS#1 v1.5 padding.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::aes::{StreamDecryptor, StreamEncryptor};
use crate::CryptoError;

/// Length of the AES shared secret in bytes.
pub const SHARED_SECRET_LEN: usize = 16;

/// Key material for one session.
pub struct KeyExchange {
    public_key: RsaPublicKey,
    verify_token: Vec<u8>,
    shared_secret: [u8; SHARED_SECRET_LEN],
}

impl KeyExchange {
    /// Import the server's key and generate a fresh shared secret.
    pub fn new(public_key_der: &[u8], verify_token: &[u8]) -> Result<Self, CryptoError> {
        let mut secret = [0u8; SHARED_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::with_secret(public_key_der, verify_token, secret)
    }

    /// Import the server's key and use a caller-chosen shared secret.
    pub fn with_secret(
        public_key_der: &[u8],
        verify_token: &[u8],
        shared_secret: [u8; SHARED_SECRET_LEN],
    ) -> Result<Self, CryptoError> {
        let public_key = RsaPublicKey::from_public_key_der(public_key_der)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self {
            public_key,
            verify_token: verify_token.to_vec(),
            shared_secret,
        })
    }

    pub fn shared_secret(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.shared_secret
    }

    /// The shared secret, encrypted for the server.
    pub fn encrypted_secret(&self) -> Result<Vec<u8>, CryptoError> {
        self.encrypt(&self.shared_secret)
    }

    /// The verify token, encrypted for the server.
    pub fn encrypted_verify_token(&self) -> Result<Vec<u8>, CryptoError> {
        self.encrypt(&self.verify_token)
    }

    /// Build the stream ciphers for both directions.
    pub fn ciphers(&self) -> (StreamEncryptor, StreamDecryptor) {
        (
            StreamEncryptor::new(&self.shared_secret),
            StreamDecryptor::new(&self.shared_secret),
        )
    }

    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, data)
            .map_err(|e| CryptoError::Encrypt(e.to_string()))
    }
}

impl std::fmt::Debug for KeyExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyExchange")
            .field("verify_token_len", &self.verify_token.len())
            .finish_non_exhaustive()
    }
}
