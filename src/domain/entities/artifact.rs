//! Build Artifact Entity
//!
//! The directory produced by the local build plus the files shipped
//! alongside it.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::Fingerprint;

/// Conventional artifact directory names, first match wins
pub const ARTIFACT_CANDIDATES: [&str; 2] = [".output", ".nuxt"];

/// Dependency lock file whose content drives remote installs
pub const MANIFEST_FILE: &str = "package-lock.json";

/// Files and directories shipped next to the artifact when present locally
pub const DECLARED_SOURCES: [&str; 5] = [
    "package.json",
    "package-lock.json",
    "public",
    "static",
    "ecosystem.config.js",
];

/// Output of a successful local build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Project root the build ran in
    pub project_root: PathBuf,
    /// Artifact directory name relative to the project root
    pub dir_name: String,
    /// Declared sources that exist locally, relative to the project root
    pub extra_sources: Vec<String>,
    /// Whether the lock file exists locally
    pub has_manifest: bool,
    /// Digest of the lock file, when present
    pub fingerprint: Option<Fingerprint>,
}

impl BuildArtifact {
    pub fn new(project_root: impl Into<PathBuf>, dir_name: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            dir_name: dir_name.into(),
            extra_sources: Vec::new(),
            has_manifest: false,
            fingerprint: None,
        }
    }

    pub fn with_extra_sources(mut self, sources: Vec<String>) -> Self {
        self.extra_sources = sources;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.has_manifest = true;
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Absolute path of the artifact directory
    pub fn dir(&self) -> PathBuf {
        self.project_root.join(&self.dir_name)
    }

    /// Resolve a project-relative source
    pub fn local_path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }

    /// All transfer sources in order: artifact first, then declared files
    pub fn sources(&self) -> Vec<String> {
        let mut sources = Vec::with_capacity(self.extra_sources.len() + 1);
        sources.push(self.dir_name.clone());
        sources.extend(
            self.extra_sources
                .iter()
                .filter(|s| **s != self.dir_name)
                .cloned(),
        );
        sources
    }

    pub fn root(&self) -> &Path {
        &self.project_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_start_with_artifact_dir() {
        let artifact = BuildArtifact::new("/tmp/app", ".output")
            .with_extra_sources(vec!["package.json".into(), "public".into()]);
        assert_eq!(artifact.sources(), vec![".output", "package.json", "public"]);
    }

    #[test]
    fn artifact_dir_is_not_listed_twice() {
        let artifact =
            BuildArtifact::new("/tmp/app", ".nuxt").with_extra_sources(vec![".nuxt".into()]);
        assert_eq!(artifact.sources(), vec![".nuxt"]);
    }

    #[test]
    fn fingerprint_marks_manifest_present() {
        let artifact = BuildArtifact::new("/tmp/app", ".output")
            .with_fingerprint(Fingerprint::of_bytes(b"{}"));
        assert!(artifact.has_manifest);
        assert_eq!(artifact.dir(), PathBuf::from("/tmp/app/.output"));
    }

    #[test]
    fn candidates_prefer_output_over_nuxt() {
        assert_eq!(ARTIFACT_CANDIDATES[0], ".output");
        assert_eq!(ARTIFACT_CANDIDATES[1], ".nuxt");
    }
}
