//! Connection Manager
//!
//! Opens the remote session on its own thread so the handshake overlaps
//! the local build. The caller joins the handle before any remote step.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::domain::entities::DeploymentDescriptor;
use crate::domain::ports::{Connector, RemoteSession};
use crate::domain::value_objects::Secret;
use crate::error::{RolloutError, RolloutResult};

type ConnectResult = RolloutResult<Box<dyn RemoteSession>>;

/// Starts background connection attempts
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Begin connecting without blocking the caller
    ///
    /// The worker owns its copies of the descriptor and password; the only
    /// thing shared with the caller is the join result.
    pub fn connect_async(
        &self,
        descriptor: &DeploymentDescriptor,
        password: Secret,
    ) -> PendingConnection {
        let connector = Arc::clone(&self.connector);
        let descriptor = descriptor.clone();
        let destination = descriptor.server.destination();
        debug!(%destination, "connecting in background");

        let handle = thread::Builder::new()
            .name("rollout-connect".to_string())
            .spawn(move || connector.connect(&descriptor, &password));

        PendingConnection {
            destination,
            handle: handle.map_err(RolloutError::from),
        }
    }

    /// Connect on the current thread
    pub fn connect(&self, descriptor: &DeploymentDescriptor, password: &Secret) -> ConnectResult {
        self.connector.connect(descriptor, password)
    }
}

/// Handle to an in-flight connection attempt
pub struct PendingConnection {
    destination: String,
    handle: RolloutResult<JoinHandle<ConnectResult>>,
}

impl PendingConnection {
    /// Wait for the attempt to finish
    pub fn join(self) -> ConnectResult {
        let handle = self.handle?;
        match handle.join() {
            Ok(result) => result,
            Err(_) => Err(RolloutError::Connection {
                destination: self.destination,
                message: "connection worker panicked".to_string(),
            }),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ServerTarget;
    use crate::domain::ports::{CommandOutput, LogObserver, TransportSpec};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    struct NullSession;

    impl RemoteSession for NullSession {
        fn exec(&mut self, _command: &str, _observer: &dyn LogObserver) -> RolloutResult<i32> {
            Ok(0)
        }

        fn capture(&mut self, _command: &str) -> RolloutResult<CommandOutput> {
            Ok(CommandOutput::default())
        }

        fn transport(&self) -> TransportSpec {
            TransportSpec::default()
        }

        fn close(&mut self) -> RolloutResult<()> {
            Ok(())
        }
    }

    /// Blocks until released, so the test can prove the caller was not blocked
    struct GatedConnector {
        gate: std::sync::Mutex<mpsc::Receiver<()>>,
        saw_password: AtomicBool,
    }

    impl Connector for GatedConnector {
        fn connect(
            &self,
            _descriptor: &DeploymentDescriptor,
            password: &Secret,
        ) -> RolloutResult<Box<dyn RemoteSession>> {
            self.saw_password
                .store(password.expose() == "pw", Ordering::SeqCst);
            let gate = self.gate.lock().unwrap();
            gate.recv_timeout(Duration::from_secs(5)).ok();
            Ok(Box::new(NullSession))
        }
    }

    struct FailingConnector;

    impl Connector for FailingConnector {
        fn connect(
            &self,
            descriptor: &DeploymentDescriptor,
            _password: &Secret,
        ) -> RolloutResult<Box<dyn RemoteSession>> {
            Err(RolloutError::Connection {
                destination: descriptor.server.destination(),
                message: "auth failed".into(),
            })
        }
    }

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor::new(ServerTarget::new("example.com", "deploy"), "/srv", "app")
    }

    #[test]
    fn connect_async_returns_before_connection_completes() {
        let (tx, rx) = mpsc::channel();
        let connector = Arc::new(GatedConnector {
            gate: std::sync::Mutex::new(rx),
            saw_password: AtomicBool::new(false),
        });
        let manager = ConnectionManager::new(connector.clone());

        let pending = manager.connect_async(&descriptor(), Secret::new("pw"));
        assert_eq!(pending.destination(), "deploy@example.com");
        tx.send(()).unwrap();

        assert!(pending.join().is_ok());
        assert!(connector.saw_password.load(Ordering::SeqCst));
    }

    #[test]
    fn join_surfaces_connection_error() {
        let manager = ConnectionManager::new(Arc::new(FailingConnector));
        let err = manager
            .connect_async(&descriptor(), Secret::empty())
            .join()
            .err()
            .unwrap();
        assert_eq!(err.kind(), "connection");
    }
}
