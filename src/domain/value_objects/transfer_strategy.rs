//! Transfer Strategy Kind
//!
//! Tag for how the artifact reaches the remote host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transfer strategy tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferStrategyKind {
    /// Copy only what changed (rsync)
    DeltaSync,
    /// Compress, copy one bundle, extract remotely
    Archive,
}

impl TransferStrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeltaSync => "delta-sync",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for TransferStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delta" | "delta-sync" | "rsync" => Ok(Self::DeltaSync),
            "archive" | "tar" => Ok(Self::Archive),
            other => Err(format!("unknown transfer strategy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("rsync".parse(), Ok(TransferStrategyKind::DeltaSync));
        assert_eq!("Delta".parse(), Ok(TransferStrategyKind::DeltaSync));
        assert_eq!("tar".parse(), Ok(TransferStrategyKind::Archive));
        assert!("ftp".parse::<TransferStrategyKind>().is_err());
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(TransferStrategyKind::DeltaSync.to_string(), "delta-sync");
        assert_eq!(TransferStrategyKind::Archive.to_string(), "archive");
    }
}
