//! Transfer Rules
//!
//! Strategy selection and the remote commands for archive transfer.
//! Archive placement is stage-then-swap: the bundle is extracted into a
//! fresh staging directory, and existing entries are only moved aside and
//! removed after their replacement has been extracted.

use crate::domain::services::shell::{join_remote, quote_path};
use crate::domain::value_objects::TransferStrategyKind;

/// Local tools that influence strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolAvailability {
    /// Delta-sync tool (rsync)
    pub delta_sync: bool,
    /// Credential injection helper (sshpass)
    pub credential_helper: bool,
}

/// Pick the transfer strategy
///
/// Delta-sync needs the sync tool, and when a password is set it also
/// needs the credential helper. `prefer_delta = false` forces archive.
pub fn select_strategy(
    tools: ToolAvailability,
    has_password: bool,
    prefer_delta: bool,
) -> TransferStrategyKind {
    let credentials_ok = !has_password || tools.credential_helper;
    if prefer_delta && tools.delta_sync && credentials_ok {
        TransferStrategyKind::DeltaSync
    } else {
        TransferStrategyKind::Archive
    }
}

/// Remote layout for one archive transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub remote_path: String,
    /// Uploaded bundle path
    pub bundle: String,
    /// Fresh extraction directory
    pub staging: String,
    /// Where replaced entries are parked until the swap completes
    pub previous: String,
}

impl ArchiveLayout {
    /// Layout keyed by a unique run stamp
    pub fn new(remote_path: &str, stamp: &str) -> Self {
        Self {
            remote_path: remote_path.to_string(),
            bundle: join_remote(remote_path, &format!("rollout-{}.tar.gz", stamp)),
            staging: join_remote(remote_path, &format!(".rollout-staging-{}", stamp)),
            previous: join_remote(remote_path, &format!(".rollout-previous-{}", stamp)),
        }
    }

    /// Remote command that makes sure the target directory exists
    pub fn prepare_command(&self) -> String {
        format!("mkdir -p {}", quote_path(&self.remote_path))
    }

    /// Extract the bundle into staging; the bundle is removed only after
    /// extraction succeeded
    pub fn stage_command(&self) -> String {
        let staging = quote_path(&self.staging);
        format!(
            "mkdir -p {staging} && tar -xzf {bundle} -C {staging} && rm -f {bundle}",
            staging = staging,
            bundle = quote_path(&self.bundle),
        )
    }

    /// Swap staged entries into place, then drop what they replaced
    pub fn swap_command(&self, entries: &[String]) -> String {
        let previous = quote_path(&self.previous);
        let mut parts = vec![format!("mkdir -p {}", previous)];
        for entry in entries {
            let live = quote_path(&join_remote(&self.remote_path, entry));
            let parked = quote_path(&join_remote(&self.previous, entry));
            let staged = quote_path(&join_remote(&self.staging, entry));
            parts.push(format!(
                "{{ [ ! -e {live} ] || mv {live} {parked}; }}",
                live = live,
                parked = parked
            ));
            parts.push(format!("mv {} {}", staged, live));
        }
        parts.push(format!(
            "rm -rf {} {}",
            previous,
            quote_path(&self.staging)
        ));
        parts.join(" && ")
    }
}
