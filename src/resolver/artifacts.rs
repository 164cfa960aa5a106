//! Artifact existence checking.
//!
//! Eager validation needs to know whether a resolved path actually exists.
//! The check goes through a capability trait so the resolver can be exercised
//! in tests against an in-memory path set instead of a real filesystem.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Capability for checking that a resolved artifact path exists.
pub trait ArtifactSource {
    /// Check whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifacts;

impl ArtifactSource for FsArtifacts {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// An in-memory path set for tests and dry runs.
///
/// A path is considered to exist if it was inserted directly or is a prefix
/// of an inserted path (directories containing known artifacts exist too).
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    paths: BTreeSet<PathBuf>,
}

impl InMemoryArtifacts {
    /// Create an empty set.
    pub fn new() -> Self {
        InMemoryArtifacts::default()
    }

    /// Register a path as existing.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.paths.insert(path.into());
        self
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for InMemoryArtifacts {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut artifacts = InMemoryArtifacts::new();
        for path in iter {
            artifacts.insert(path);
        }
        artifacts
    }
}

impl ArtifactSource for InMemoryArtifacts {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path) || self.paths.iter().any(|p| p.starts_with(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_exact_match() {
        let artifacts: InMemoryArtifacts = ["/sdk/lib/ImSDK.lib"].into_iter().collect();
        assert!(artifacts.exists(Path::new("/sdk/lib/ImSDK.lib")));
        assert!(!artifacts.exists(Path::new("/sdk/lib/Other.lib")));
    }

    #[test]
    fn test_in_memory_parent_directories_exist() {
        let artifacts: InMemoryArtifacts = ["/sdk/include/V2TIMManager.h"].into_iter().collect();
        assert!(artifacts.exists(Path::new("/sdk/include")));
        assert!(artifacts.exists(Path::new("/sdk")));
    }
}
