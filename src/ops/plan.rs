//! Plan operation: load a manifest, build the placeholder environment and
//! resolve one platform's descriptor into a staging plan.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::descriptor::{find_manifest, DescriptorSet};
use crate::core::plan::ResolutionPlan;
use crate::core::platform::PlatformTarget;
use crate::resolver::{
    CheckMode, FsArtifacts, PlaceholderEnv, ResolveError, ResolveOptions, Resolver,
};
use crate::util::diagnostic::suggestions;

/// Options for producing a resolution plan.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Explicit manifest path; discovered from the working directory if unset
    pub manifest_path: Option<PathBuf>,

    /// Directory staged artifacts are destined for
    pub output_dir: PathBuf,

    /// Artifact validation policy
    pub mode: CheckMode,

    /// Extra placeholder definitions, applied after the built-in ones
    pub defines: Vec<(String, String)>,
}

impl PlanOptions {
    /// Create strict options with the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        PlanOptions {
            manifest_path: None,
            output_dir: output_dir.into(),
            mode: CheckMode::Strict,
            defines: Vec::new(),
        }
    }

    /// Use an explicit manifest path instead of searching for one.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Set the validation mode.
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Error from the plan operation.
///
/// Resolution failures stay typed so callers can render them as structured
/// diagnostics; everything else (I/O, manifest discovery) flows as anyhow.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Load the descriptor set, either from an explicit path or by walking up
/// from the current directory.
pub fn load_descriptor_set(manifest_path: Option<&Path>) -> Result<DescriptorSet> {
    let path = match manifest_path {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            find_manifest(&cwd).with_context(|| suggestions::NO_MANIFEST)?
        }
    };
    DescriptorSet::load(&path)
}

/// Build the placeholder environment for a resolution run.
///
/// `ModuleDir` is the manifest's directory and `BinaryOutputDir` is the
/// staging output directory. User definitions come last and may override
/// either.
pub fn build_env(
    set: &DescriptorSet,
    output_dir: &Path,
    defines: &[(String, String)],
) -> PlaceholderEnv {
    let mut env = PlaceholderEnv::new();
    env.define("ModuleDir", set.manifest_dir.to_string_lossy());
    env.define("BinaryOutputDir", output_dir.to_string_lossy());

    for (name, value) in defines {
        env.define(name, value);
    }

    env
}

/// Resolve the plan for one platform against the real filesystem.
pub fn resolve_platform(
    opts: &PlanOptions,
    platform: PlatformTarget,
) -> Result<ResolutionPlan, PlanError> {
    let set = load_descriptor_set(opts.manifest_path.as_deref())?;
    resolve_platform_in(&set, opts, platform)
}

/// Resolve the plan for one platform from an already-loaded descriptor set.
pub fn resolve_platform_in(
    set: &DescriptorSet,
    opts: &PlanOptions,
    platform: PlatformTarget,
) -> Result<ResolutionPlan, PlanError> {
    let env = build_env(set, &opts.output_dir, &opts.defines);
    let artifacts = FsArtifacts;
    let resolver = Resolver::new(
        &artifacts,
        ResolveOptions::new(&opts.output_dir).with_mode(opts.mode),
    );

    tracing::info!("Resolving `{}` for {}", set.package.name, platform);
    Ok(resolver.resolve(set, platform, &env)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir.join("Windows/include")).unwrap();
        fs::create_dir_all(dir.join("Windows/lib/Win64")).unwrap();
        fs::write(dir.join("Windows/lib/Win64/ImSDK.lib"), b"lib").unwrap();
        fs::write(dir.join("Windows/lib/Win64/ImSDK.dll"), b"dll").unwrap();

        let manifest = dir.join("stevedore.toml");
        fs::write(
            &manifest,
            r#"
[package]
name = "imsdk"

[platforms.win64]
include_paths = ["$(ModuleDir)/Windows/include"]
libraries = ["$(ModuleDir)/Windows/lib/Win64/ImSDK.lib"]
delay_load_libraries = ["$(ModuleDir)/Windows/lib/Win64/ImSDK.dll"]
"#,
        )
        .unwrap();
        manifest
    }

    #[test]
    fn test_build_env_defines_override_builtins() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_fixture(tmp.path());
        let set = load_descriptor_set(Some(&manifest)).unwrap();

        let defines = vec![("ModuleDir".to_string(), "/elsewhere".to_string())];
        let env = build_env(&set, Path::new("/out"), &defines);

        assert_eq!(env.get("ModuleDir"), Some("/elsewhere"));
        assert_eq!(env.get("BinaryOutputDir"), Some("/out"));
    }

    #[test]
    fn test_resolve_platform_against_filesystem() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_fixture(tmp.path());

        let opts = PlanOptions::new(tmp.path().join("out")).with_manifest_path(&manifest);
        let plan = resolve_platform(&opts, PlatformTarget::Win64).unwrap();

        assert_eq!(plan.include_paths.len(), 1);
        assert_eq!(plan.delay_load.len(), 1);
        assert_eq!(plan.staging.len(), 1);
        assert_eq!(
            plan.staging[0].destination,
            tmp.path().join("out").join("ImSDK.dll")
        );
    }

    #[test]
    fn test_resolve_platform_strict_missing_artifact() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_fixture(tmp.path());
        fs::remove_file(tmp.path().join("Windows/lib/Win64/ImSDK.lib")).unwrap();

        let opts = PlanOptions::new(tmp.path().join("out")).with_manifest_path(&manifest);
        let err = resolve_platform(&opts, PlatformTarget::Win64).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Resolve(ResolveError::MissingArtifact { .. })
        ));
    }
}
