//! Value Objects
//!
//! Immutable types with no identity, compared by value.

mod fingerprint;
mod log_event;
mod package_manager;
mod secret;
mod stage;
mod transfer_strategy;

pub use fingerprint::Fingerprint;
pub use log_event::{Channel, LogEvent};
pub use package_manager::PackageManager;
pub use secret::Secret;
pub use stage::DeployStage;
pub use transfer_strategy::TransferStrategyKind;
