//! Dependency descriptors and the `stevedore.toml` manifest.
//!
//! A descriptor is the declarative record of where a platform's pre-built
//! native artifacts live: include directories, static/import libraries,
//! delay-loaded shared libraries, runtime staging copies, an optional app
//! bundle and an optional auxiliary manifest for platforms that need extra
//! build-descriptor injection.
//!
//! Descriptors are authored once as configuration data and never mutated at
//! resolution time. Path strings may contain `$(NAME)` placeholders (resolved
//! against a substitution environment) and `{arch}` segments (fanned out over
//! the declared architecture list).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformTarget;
use crate::util::diagnostic::ManifestParseError;

/// Canonical manifest filename.
pub const MANIFEST_NAME: &str = "stevedore.toml";

/// Architecture placeholder recognized in library and staging templates.
pub const ARCH_TOKEN: &str = "{arch}";

/// A runtime staging copy: stage `source` to `destination` beside the
/// produced executable or bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDependency {
    /// Artifact to copy (may contain placeholders or a glob pattern)
    pub source: String,

    /// Staged location (may contain placeholders)
    pub destination: String,
}

/// An app-bundle or framework reference for bundle-based platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    /// Logical bundle name (e.g. the framework name)
    pub name: String,

    /// Bundle location on disk (directory or archive)
    pub path: String,

    /// Paths inside the bundle that must be staged with the build output,
    /// relative to the bundle root (binary, Info.plist, ...)
    #[serde(default)]
    pub inner_paths: Vec<String>,
}

/// Per-platform native-dependency descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyDescriptor {
    /// Include directories, in compiler search order
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Static/import library artifacts to link against
    #[serde(default)]
    pub libraries: Vec<String>,

    /// Shared libraries requiring deferred binding at runtime
    #[serde(default)]
    pub delay_load_libraries: Vec<String>,

    /// Runtime artifacts staged beside the build output
    #[serde(default)]
    pub runtime_dependencies: Vec<RuntimeDependency>,

    /// Bundle/framework reference (bundle-based platforms only)
    #[serde(default)]
    pub bundle: Option<BundleSpec>,

    /// Sub-architectures to fan library templates out over
    #[serde(default)]
    pub architectures: Option<Vec<String>>,

    /// Extra build-descriptor file consumed by a later pipeline stage
    /// (e.g. an Android plugin manifest)
    #[serde(default)]
    pub auxiliary_manifest: Option<String>,
}

/// A structural problem with a descriptor, named by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    /// Descriptor field the problem was found in
    pub field: &'static str,

    /// What is wrong
    pub message: String,
}

impl DescriptorIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        DescriptorIssue {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl DependencyDescriptor {
    /// The architecture list library templates fan out over: the declared
    /// list if present, otherwise the platform default.
    pub fn effective_architectures(&self, platform: PlatformTarget) -> Vec<String> {
        match &self.architectures {
            Some(archs) => archs.clone(),
            None => platform
                .default_architectures()
                .iter()
                .map(|a| (*a).to_string())
                .collect(),
        }
    }

    /// Check if any template in this descriptor uses the `{arch}` token.
    pub fn uses_arch_token(&self) -> bool {
        self.libraries.iter().any(|l| l.contains(ARCH_TOKEN))
            || self.delay_load_libraries.iter().any(|l| l.contains(ARCH_TOKEN))
            || self
                .runtime_dependencies
                .iter()
                .any(|r| r.source.contains(ARCH_TOKEN) || r.destination.contains(ARCH_TOKEN))
    }

    /// Validate the descriptor's structure for a given platform.
    ///
    /// Returns every problem found, not just the first, so callers can
    /// surface a complete report. Filesystem existence is not checked here;
    /// that is the resolver's job.
    pub fn validate(&self, platform: PlatformTarget) -> Vec<DescriptorIssue> {
        let mut issues = Vec::new();

        if let Some(archs) = &self.architectures {
            if archs.is_empty() {
                issues.push(DescriptorIssue::new(
                    "architectures",
                    "declared but empty; remove the field or list at least one architecture",
                ));
            }
            let mut seen = Vec::new();
            for arch in archs {
                if arch.trim().is_empty() {
                    issues.push(DescriptorIssue::new("architectures", "empty architecture name"));
                } else if seen.contains(&arch) {
                    issues.push(DescriptorIssue::new(
                        "architectures",
                        format!("duplicate architecture '{}'", arch),
                    ));
                } else {
                    seen.push(arch);
                }
            }
            if !platform.is_multi_arch() {
                issues.push(DescriptorIssue::new(
                    "architectures",
                    format!("'{}' is a single-architecture platform", platform),
                ));
            }
        }

        if self.uses_arch_token() && self.effective_architectures(platform).is_empty() {
            issues.push(DescriptorIssue::new(
                "libraries",
                format!(
                    "path templates use '{}' but no architectures apply to '{}'",
                    ARCH_TOKEN, platform
                ),
            ));
        }

        if !self.delay_load_libraries.is_empty() && !platform.supports_delay_load() {
            issues.push(DescriptorIssue::new(
                "delay_load_libraries",
                format!(
                    "'{}' does not support deferred binding; declare the artifact under \
                     `libraries` or inside `bundle` instead",
                    platform
                ),
            ));
        }

        if let Some(bundle) = &self.bundle {
            if !platform.uses_bundles() {
                issues.push(DescriptorIssue::new(
                    "bundle",
                    format!("'{}' does not use bundle packaging", platform),
                ));
            }
            if !self.libraries.is_empty() {
                issues.push(DescriptorIssue::new(
                    "bundle",
                    "bundle packaging excludes raw link libraries; move them into the bundle",
                ));
            }
            if bundle.name.trim().is_empty() {
                issues.push(DescriptorIssue::new("bundle", "bundle name is empty"));
            }
            if bundle.path.trim().is_empty() {
                issues.push(DescriptorIssue::new("bundle", "bundle path is empty"));
            }
        }

        for (field, entries) in [
            ("include_paths", &self.include_paths),
            ("libraries", &self.libraries),
            ("delay_load_libraries", &self.delay_load_libraries),
        ] {
            for entry in entries {
                if entry.trim().is_empty() {
                    issues.push(DescriptorIssue::new(field, "empty path entry"));
                }
            }
        }

        for dep in &self.runtime_dependencies {
            if dep.source.trim().is_empty() {
                issues.push(DescriptorIssue::new("runtime_dependencies", "empty source path"));
            }
            if dep.destination.trim().is_empty() {
                issues.push(DescriptorIssue::new(
                    "runtime_dependencies",
                    "empty destination path",
                ));
            }
        }

        issues
    }
}

/// Package metadata from the `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Dependency name (the SDK being wrapped)
    pub name: String,

    /// SDK version string, if known
    #[serde(default)]
    pub version: Option<String>,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw manifest shape as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawManifest {
    package: PackageMetadata,

    #[serde(default)]
    platforms: BTreeMap<String, DependencyDescriptor>,
}

/// The loaded descriptor set: one descriptor per declared platform.
///
/// Loaded once per build invocation and read-only afterwards, so it is safe
/// to resolve different targets from multiple threads.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    /// Package metadata
    pub package: PackageMetadata,

    /// Descriptors keyed by platform, in canonical order
    pub platforms: BTreeMap<PlatformTarget, DependencyDescriptor>,

    /// Directory containing the manifest (anchor for relative paths)
    pub manifest_dir: PathBuf,
}

impl DescriptorSet {
    /// Parse a descriptor set from TOML contents.
    ///
    /// Unknown platform keys are rejected at load time rather than being
    /// silently carried along to resolution.
    pub fn from_toml_str(contents: &str, manifest_dir: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents).map_err(|e| {
            anyhow::Error::new(ManifestParseError {
                message: e.message().to_string(),
                src: NamedSource::new(MANIFEST_NAME, contents.to_string()),
                span: e.span().map(SourceSpan::from),
            })
        })?;

        let mut platforms = BTreeMap::new();
        for (key, descriptor) in raw.platforms {
            let platform: PlatformTarget = key
                .parse()
                .map_err(|e: String| anyhow::anyhow!("invalid platform key: {}", e))?;
            if platforms.insert(platform, descriptor).is_some() {
                bail!("platform '{}' declared more than once", platform);
            }
        }

        Ok(DescriptorSet {
            package: raw.package,
            platforms,
            manifest_dir: manifest_dir.to_path_buf(),
        })
    }

    /// Load a descriptor set from a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&contents, manifest_dir)
            .with_context(|| format!("failed to load manifest: {}", path.display()))
    }

    /// Look up the descriptor for a platform.
    pub fn get(&self, platform: PlatformTarget) -> Option<&DependencyDescriptor> {
        self.platforms.get(&platform)
    }

    /// Platforms declared in this set, in canonical order.
    pub fn declared_platforms(&self) -> Vec<PlatformTarget> {
        self.platforms.keys().copied().collect()
    }
}

/// Find the manifest by walking up from `start` to the filesystem root.
pub fn find_manifest(start: &Path) -> Result<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        dir = current.parent();
    }
    bail!(
        "could not find `{}` in `{}` or any parent directory",
        MANIFEST_NAME,
        start.display()
    );
}
