//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeploymentOrchestrator` - One full deployment run
//! - `BuildRunner` - Local install and build, artifact discovery
//! - `ConnectionManager` - Background session establishment
//! - `TransferPlanner` - Strategy selection with one-shot fallback
//! - `DependencyDiffer` - Remote install skip decision
//! - `ProcessStatusQuery` / `RemoteLogsQuery` - Read-only supervisor queries

pub mod build;
pub mod connection;
pub mod dependencies;
pub mod deploy;
pub mod observer;
pub mod status;
pub mod transfer;

pub use build::BuildRunner;
pub use connection::{ConnectionManager, PendingConnection};
pub use dependencies::DependencyDiffer;
pub use deploy::{DeployOptions, DeployReport, DeploymentOrchestrator};
pub use observer::EventLineObserver;
pub use status::{parse_process_list, ProcessInfo, ProcessStatusQuery, RemoteLogsQuery};
pub use transfer::TransferPlanner;
