//! Archive bundle
//!
//! Packs the transfer sources into one gzip-compressed tarball. Symlinks
//! are followed so the remote side receives real files.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use tracing::debug;

use crate::domain::entities::BuildArtifact;
use crate::error::{RolloutError, RolloutResult};

/// Default gzip level for bundles
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 1;

/// A bundle on local disk; removed with its directory on drop
pub struct Bundle {
    _dir: TempDir,
    path: PathBuf,
    file_name: String,
}

impl Bundle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `rollout-<stamp>.tar.gz`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Unique per-run stamp: UTC time plus process id
pub fn run_stamp() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        std::process::id()
    )
}

/// Pack `sources` (project-relative) into a bundle named after `stamp`
pub fn create_bundle(
    artifact: &BuildArtifact,
    sources: &[String],
    stamp: &str,
    compression_level: u32,
) -> RolloutResult<Bundle> {
    let dir = tempfile::Builder::new().prefix("rollout-bundle-").tempdir()?;
    let file_name = format!("rollout-{}.tar.gz", stamp);
    let path = dir.path().join(&file_name);

    let output = File::create(&path)?;
    let encoder = GzEncoder::new(output, Compression::new(compression_level.min(9)));
    let mut archive = tar::Builder::new(encoder);
    archive.follow_symlinks(true);

    for source in sources {
        let local = artifact.local_path(source);
        if local.is_dir() {
            archive.append_dir_all(source, &local)?;
        } else if local.is_file() {
            archive.append_path_with_name(&local, source)?;
        } else {
            return Err(RolloutError::Transfer {
                strategy: "archive",
                message: format!("source '{}' does not exist", source),
            });
        }
    }

    archive.into_inner()?.finish()?;
    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    debug!(bundle = %path.display(), size, entries = sources.len(), "bundle written");

    Ok(Bundle {
        _dir: dir,
        path,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;

    fn entries(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn bundle_contains_artifact_and_declared_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".output/server")).unwrap();
        fs::write(dir.path().join(".output/server/index.mjs"), "export {}").unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let artifact = BuildArtifact::new(dir.path(), ".output")
            .with_extra_sources(vec!["package.json".into()]);

        let bundle = create_bundle(&artifact, &artifact.sources(), "t1", 1).unwrap();
        assert_eq!(bundle.file_name(), "rollout-t1.tar.gz");

        let names = entries(bundle.path());
        assert!(names.iter().any(|n| n == ".output/server/index.mjs"));
        assert!(names.iter().any(|n| n == "package.json"));
    }

    #[test]
    fn missing_source_is_a_transfer_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = BuildArtifact::new(dir.path(), ".output");
        let err = create_bundle(&artifact, &[".output".into()], "t2", 6)
            .err()
            .unwrap();
        assert_eq!(err.kind(), "transfer");
    }

    #[test]
    fn bundle_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let artifact = BuildArtifact::new(dir.path(), "package.json");
        let bundle = create_bundle(&artifact, &["package.json".into()], "t3", 6).unwrap();
        let path = bundle.path().to_path_buf();
        assert!(path.exists());
        drop(bundle);
        assert!(!path.exists());
    }

    #[test]
    fn stamps_are_sortable_and_carry_pid() {
        let stamp = run_stamp();
        assert!(stamp.ends_with(&format!("-{}", std::process::id())));
        assert_eq!(stamp.split('-').next().unwrap().len(), 14);
    }
}
