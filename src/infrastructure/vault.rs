//! Credential Vault
//!
//! Machine-bound secret storage. The key is derived with PBKDF2-HMAC-SHA256
//! from the OS user and host name, so nothing is persisted and the same
//! identity always reproduces the same key. Ciphertext is AES-256-GCM with
//! a random nonce:
//!
//! ```text
//! v1$<iterations>$<nonce hex>$<ciphertext hex>
//! ```
//!
//! Decryption never fails loudly: any problem yields an empty secret so a
//! descriptor copied to another machine simply has no password.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::Sha256;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::ports::SecretCipher;
use crate::domain::value_objects::Secret;
use crate::error::{RolloutError, RolloutResult};

/// Fixed domain-separation salt
const SALT: &[u8] = b"rollout.credential-vault.v1";

/// PBKDF2 rounds for newly encrypted secrets
pub const DEFAULT_ITERATIONS: u32 = 210_000;

const FORMAT_VERSION: &str = "v1";
const NONCE_LEN: usize = 12;

/// Who the key is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineIdentity {
    pub user: String,
    pub host: String,
}

impl MachineIdentity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Identity of the current process
    pub fn current() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();
        Self::new(user, host_name())
    }

    fn material(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

#[cfg(unix)]
fn host_name() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for buf.len() bytes; gethostname NUL-terminates on success.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return String::new();
    }
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(not(unix))]
fn host_name() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_default()
}

/// PBKDF2-derived AES-256-GCM cipher
pub struct CredentialVault {
    identity: MachineIdentity,
    iterations: u32,
}

impl CredentialVault {
    pub fn new() -> Self {
        Self::with_identity(MachineIdentity::current())
    }

    pub fn with_identity(identity: MachineIdentity) -> Self {
        Self {
            identity,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the round count for new ciphertexts
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    fn derive_key(&self, iterations: u32) -> Zeroizing<[u8; 32]> {
        let mut key = Zeroizing::new([0u8; 32]);
        pbkdf2::pbkdf2_hmac::<Sha256>(
            self.identity.material().as_bytes(),
            SALT,
            iterations,
            &mut key[..],
        );
        key
    }

    fn cipher(&self, iterations: u32) -> Aes256Gcm {
        let key = self.derive_key(iterations);
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]))
    }

    fn open(&self, ciphertext: &str) -> Option<Zeroizing<String>> {
        let mut parts = ciphertext.trim().split('$');
        if parts.next()? != FORMAT_VERSION {
            return None;
        }
        let iterations: u32 = parts.next()?.parse().ok()?;
        let nonce = hex::decode(parts.next()?).ok()?;
        let sealed = hex::decode(parts.next()?).ok()?;
        if parts.next().is_some() || nonce.len() != NONCE_LEN || iterations == 0 {
            return None;
        }
        let plain = self
            .cipher(iterations)
            .decrypt(Nonce::from_slice(&nonce), sealed.as_ref())
            .ok()?;
        let plain = Zeroizing::new(plain);
        String::from_utf8(plain.to_vec()).ok().map(Zeroizing::new)
    }
}

impl Default for CredentialVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretCipher for CredentialVault {
    fn encrypt(&self, plaintext: &str) -> RolloutResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher(self.iterations)
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| RolloutError::Credential)?;
        debug!(iterations = self.iterations, "secret encrypted");
        Ok(format!(
            "{}${}${}${}",
            FORMAT_VERSION,
            self.iterations,
            hex::encode(nonce),
            hex::encode(sealed)
        ))
    }

    fn decrypt(&self, ciphertext: &str) -> Secret {
        if ciphertext.trim().is_empty() {
            return Secret::empty();
        }
        match self.open(ciphertext) {
            Some(plain) => Secret::new(plain.as_str()),
            None => {
                warn!("stored password could not be decrypted on this machine; continuing without it");
                Secret::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(user: &str, host: &str) -> CredentialVault {
        CredentialVault::with_identity(MachineIdentity::new(user, host)).with_iterations(1_000)
    }

    #[test]
    fn round_trip_on_same_identity() {
        let v = vault("deploy", "laptop");
        let sealed = v.encrypt("s3cret pass").unwrap();
        assert!(sealed.starts_with("v1$1000$"));
        assert_eq!(v.decrypt(&sealed).expose(), "s3cret pass");
    }

    #[test]
    fn empty_plaintext_encrypts_to_empty() {
        assert_eq!(vault("a", "b").encrypt("").unwrap(), "");
        assert!(vault("a", "b").decrypt("").is_empty());
    }

    #[test]
    fn other_identity_yields_empty_secret() {
        let sealed = vault("deploy", "laptop").encrypt("pw").unwrap();
        assert!(vault("deploy", "desktop").decrypt(&sealed).is_empty());
        assert!(vault("root", "laptop").decrypt(&sealed).is_empty());
    }

    #[test]
    fn tampering_yields_empty_secret() {
        let v = vault("deploy", "laptop");
        let sealed = v.encrypt("pw").unwrap();
        let mut tampered = sealed.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(v.decrypt(&tampered).is_empty());
        assert!(v.decrypt("not-a-ciphertext").is_empty());
        assert!(v.decrypt("v1$abc$00$00").is_empty());
    }

    #[test]
    fn nonces_differ_between_encryptions() {
        let v = vault("deploy", "laptop");
        assert_ne!(v.encrypt("pw").unwrap(), v.encrypt("pw").unwrap());
    }

    #[test]
    fn decrypt_honours_stored_iteration_count() {
        let sealed = vault("u", "h").with_iterations(500).encrypt("pw").unwrap();
        assert_eq!(vault("u", "h").decrypt(&sealed).expose(), "pw");
    }
}
