//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod cipher;
pub mod command_runner;
pub mod deploy_events;
pub mod remote;
pub mod transfer;

pub use cipher::SecretCipher;
pub use command_runner::{CommandRunner, CommandSpec, DiscardObserver, LogObserver};
pub use deploy_events::{DeployEvent, DeployEventSink, LineSource, NoopEventSink};
pub use remote::{CommandOutput, Connector, RemoteSession, TransportSpec};
pub use transfer::TransferStrategy;
