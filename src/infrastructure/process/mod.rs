//! Local process execution

mod local;
mod stream;

pub use local::SystemCommandRunner;
pub use stream::SessionLogStream;
