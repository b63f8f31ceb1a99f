//! Secret Cipher Port

use crate::domain::value_objects::Secret;
use crate::error::RolloutResult;

/// Encrypts secrets for storage and decrypts them for one run
pub trait SecretCipher: Send + Sync {
    /// Ciphertext for storage; empty input yields an empty string
    fn encrypt(&self, plaintext: &str) -> RolloutResult<String>;

    /// Plaintext, or the empty secret when decryption fails for any reason
    fn decrypt(&self, ciphertext: &str) -> Secret;
}
