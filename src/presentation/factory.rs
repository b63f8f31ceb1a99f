//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use tracing::debug;

use crate::application::{
    BuildRunner, ConnectionManager, DependencyDiffer, DeploymentOrchestrator, TransferPlanner,
};
use crate::config::Config;
use crate::domain::ports::{CommandRunner, Connector, SecretCipher, TransferStrategy};
use crate::domain::services::ToolAvailability;
use crate::infrastructure::ssh::CREDENTIAL_HELPER;
use crate::infrastructure::{
    ArchiveTransfer, CredentialVault, RsyncTransfer, SshConnector, SshSettings,
    SystemCommandRunner,
};

/// Probe the local tools that steer strategy selection
pub fn probe_tools(runner: &dyn CommandRunner, delta: &dyn TransferStrategy) -> ToolAvailability {
    let tools = ToolAvailability {
        delta_sync: delta.is_available(),
        credential_helper: runner.is_available(CREDENTIAL_HELPER),
    };
    debug!(?tools, "local transfer tools");
    tools
}

/// SSH connector configured from `[connection]`
pub fn create_connector(config: &Config) -> Arc<dyn Connector> {
    let settings = SshSettings::default()
        .with_connect_timeout(config.connection.timeout())
        .with_strict_host_key_checking(config.connection.strict_host_key_checking.clone());
    Arc::new(SshConnector::new(settings))
}

/// Machine-bound credential vault
pub fn create_cipher() -> Arc<dyn SecretCipher> {
    Arc::new(CredentialVault::new())
}

/// Connection manager for read-only commands (`ps`, `logs`)
pub fn create_connection_manager(config: &Config) -> ConnectionManager {
    ConnectionManager::new(create_connector(config))
}

/// Create the deployment orchestrator with all dependencies wired up
pub fn create_orchestrator(config: &Config) -> DeploymentOrchestrator {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    create_orchestrator_with(config, runner, create_connector(config), create_cipher())
}

/// Create the orchestrator around explicit ports
pub fn create_orchestrator_with(
    config: &Config,
    runner: Arc<dyn CommandRunner>,
    connector: Arc<dyn Connector>,
    cipher: Arc<dyn SecretCipher>,
) -> DeploymentOrchestrator {
    let delta: Arc<dyn TransferStrategy> = Arc::new(RsyncTransfer::new(Arc::clone(&runner)));
    let archive: Arc<dyn TransferStrategy> = Arc::new(
        ArchiveTransfer::new(Arc::clone(&runner))
            .with_compression_level(config.transfer.compression_level),
    );
    let tools = probe_tools(runner.as_ref(), delta.as_ref());

    let planner = TransferPlanner::new(vec![delta, archive], tools)
        .with_prefer_delta(config.transfer.prefer_delta);
    let build = BuildRunner::new(runner).with_package_manager(config.build.package_manager);

    DeploymentOrchestrator::new(
        build,
        ConnectionManager::new(connector),
        planner,
        DependencyDiffer::new(),
        cipher,
    )
}
