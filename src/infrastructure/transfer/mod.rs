//! Transfer strategies

mod archive;
mod bundle;
mod rsync;

pub use archive::ArchiveTransfer;
pub use bundle::{create_bundle, run_stamp, Bundle, DEFAULT_COMPRESSION_LEVEL};
pub use rsync::RsyncTransfer;
