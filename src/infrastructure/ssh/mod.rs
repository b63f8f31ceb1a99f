//! Remote shell over the system OpenSSH client

mod connector;
mod options;
mod session;

pub use connector::{SshConnector, CREDENTIAL_HELPER};
pub use options::{SshSettings, DEFAULT_CONNECT_TIMEOUT};
pub use session::SshSession;
