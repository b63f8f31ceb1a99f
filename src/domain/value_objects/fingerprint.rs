//! Dependency Fingerprint Value Object
//!
//! A SHA-256 digest of the dependency lock/manifest file. The remote marker
//! file stores the bare lowercase hex form, nothing else.

use std::fmt;

use sha2::{Digest, Sha256};

/// Content fingerprint of a dependency manifest
///
/// Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of a SHA-256 digest in hex characters
    pub const HEX_LEN: usize = 64;

    /// Compute the fingerprint of raw manifest bytes
    pub fn of_bytes(content: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(content)))
    }

    /// Parse the content of a remote marker file
    ///
    /// Surrounding whitespace (the trailing newline written by `printf`) is
    /// ignored. Anything that is not a well-formed digest counts as "no
    /// marker recorded".
    pub fn parse_marker(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let valid = trimmed.len() == Self::HEX_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(trimmed.to_string()))
    }

    /// Hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for display
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
