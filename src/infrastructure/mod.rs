//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process/` - Local subprocesses and the line pump
//! - `ssh/` - OpenSSH ControlMaster connector and session
//! - `transfer/` - Delta-sync and archive strategies
//! - `repositories/` - Descriptor files
//! - `events/` - NDJSON event sink

pub mod events;
pub mod lock;
pub mod process;
pub mod repositories;
pub mod ssh;
pub mod transfer;
pub mod vault;

// Re-export for convenience
pub use events::JsonEventSink;
pub use lock::RunLock;
pub use process::{SessionLogStream, SystemCommandRunner};
pub use repositories::{DescriptorOverrides, DescriptorTemplate, JsonDescriptorRepository};
pub use ssh::{SshConnector, SshSettings};
pub use transfer::{ArchiveTransfer, RsyncTransfer};
pub use vault::{CredentialVault, MachineIdentity};
