//! Package Manager Value Object
//!
//! The local build tool and the verbs rollout invokes on it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Package manager used for the local install and build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Clean install honouring the lock file exactly
    ///
    /// npm without a lock file falls back to a plain install.
    pub fn clean_install_args(&self, has_lock: bool) -> Vec<&'static str> {
        match self {
            Self::Npm if has_lock => vec!["ci", "--no-audit", "--no-progress"],
            Self::Npm => vec!["install", "--no-audit", "--no-progress"],
            Self::Pnpm | Self::Yarn => vec!["install", "--frozen-lockfile"],
        }
    }

    /// Incremental install reusing the local cache
    pub fn incremental_install_args(&self) -> Vec<&'static str> {
        match self {
            Self::Npm => vec!["install", "--prefer-offline", "--no-audit", "--no-progress"],
            Self::Pnpm | Self::Yarn => vec!["install", "--prefer-offline"],
        }
    }

    pub fn build_args(&self) -> Vec<&'static str> {
        vec!["run", "build"]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl std::str::FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            other => Err(format!("unsupported package manager '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_npm() {
        assert_eq!(PackageManager::default(), PackageManager::Npm);
    }

    #[test]
    fn npm_clean_install_needs_lock_for_ci() {
        assert_eq!(PackageManager::Npm.clean_install_args(true)[0], "ci");
        assert_eq!(PackageManager::Npm.clean_install_args(false)[0], "install");
    }

    #[test]
    fn serde_lowercase() {
        let pm: PackageManager = serde_json::from_str(r#""pnpm""#).unwrap();
        assert_eq!(pm, PackageManager::Pnpm);
        assert_eq!("Yarn".parse::<PackageManager>().unwrap(), PackageManager::Yarn);
        assert!("bun".parse::<PackageManager>().is_err());
    }
}
