//! In-memory secret
//!
//! Holds a decrypted credential for the duration of one run. The buffer is
//! wiped on drop and never printed.

use std::fmt;

use zeroize::Zeroizing;

/// Decrypted secret (e.g. an SSH password)
#[derive(Clone, Default)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The empty secret: "no password set"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the plaintext. Callers must not copy it into logs or events.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_plaintext() {
        let secret = Secret::new("hunter2");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("hunter2"));
        assert_eq!(rendered, "Secret(<redacted>)");
    }

    #[test]
    fn empty_secret() {
        assert!(Secret::empty().is_empty());
        assert_eq!(format!("{:?}", Secret::empty()), "Secret(<empty>)");
    }

    #[test]
    fn expose_returns_plaintext() {
        assert_eq!(Secret::new("pw").expose(), "pw");
    }
}
