//! AES-128-CFB8 stream encryption.
//!
//! Once the key exchange completes, every byte in both directions passes
//! through a CFB8 cipher keyed with the shared secret, which also serves as
//! the IV. The cipher state runs continuously across messages, so each
//! direction owns one long-lived instance.

use aes::Aes128;
use cfb8::cipher::generic_array::GenericArray;
use cfb8::cipher::KeyIvInit;
use cfb8::cipher::{BlockDecryptMut, BlockEncryptMut};
use cfb8::{Decryptor, Encryptor};

/// Outbound half: encrypts bytes in place.
pub struct StreamEncryptor {
    cipher: Encryptor<Aes128>,
}

impl StreamEncryptor {
    pub fn new(secret: &[u8; 16]) -> Self {
        Self {
            cipher: Encryptor::<Aes128>::new(secret.into(), secret.into()),
        }
    }

    pub fn encrypt(&mut self, data: &mut [u8]) {
        // One byte per block keeps the stream state across calls.
        for byte in data.iter_mut() {
            let mut block = GenericArray::clone_from_slice(std::slice::from_ref(byte));
            self.cipher.encrypt_block_mut(&mut block);
            *byte = block[0];
        }
    }
}

/// Inbound half: decrypts bytes in place.
pub struct StreamDecryptor {
    cipher: Decryptor<Aes128>,
}

impl StreamDecryptor {
    pub fn new(secret: &[u8; 16]) -> Self {
        Self {
            cipher: Decryptor::<Aes128>::new(secret.into(), secret.into()),
        }
    }

    pub fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            let mut block = GenericArray::clone_from_slice(std::slice::from_ref(byte));
            self.cipher.decrypt_block_mut(&mut block);
            *byte = block[0];
        }
    }
}
