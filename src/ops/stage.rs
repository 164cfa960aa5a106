//! Staging execution.
//!
//! Carries out a resolved plan's copy actions: expands glob sources, copies
//! files and bundle directories into the output directory, and records a
//! staging manifest so unchanged artifacts are skipped on the next run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::plan::ResolutionPlan;
use crate::util::fs::{copy_dir_all, copy_file, ensure_dir, expand_glob, has_glob_meta};
use crate::util::hash::sha256_file;

/// Name of the manifest written next to staged artifacts.
pub const STAGING_MANIFEST_NAME: &str = "staging_manifest.json";

/// Options for executing a staging plan.
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Output directory for staged artifacts
    pub output_dir: PathBuf,

    /// List actions without copying anything
    pub dry_run: bool,

    /// Write the staging manifest after copying
    pub write_manifest: bool,
}

impl StageOptions {
    /// Create options with the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        StageOptions {
            output_dir: output_dir.into(),
            dry_run: false,
            write_manifest: true,
        }
    }

    /// Set dry run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One staged file, as recorded in the staging manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedFile {
    /// Source path the file was copied from
    pub source: PathBuf,

    /// Destination path under the output directory
    pub destination: PathBuf,

    /// SHA-256 of the file contents, hex encoded
    pub sha256: String,

    /// File size in bytes
    pub size: u64,
}

/// Manifest of everything staged into an output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingManifest {
    /// Manifest format version
    pub version: u32,

    /// Platform the plan was resolved for
    pub platform: String,

    /// Staged files
    pub files: Vec<StagedFile>,
}

impl StagingManifest {
    fn new(platform: String) -> Self {
        StagingManifest {
            version: 1,
            platform,
            files: Vec::new(),
        }
    }

    /// Load the manifest from an output directory, if present and readable.
    pub fn load(output_dir: &Path) -> Option<Self> {
        let path = output_dir.join(STAGING_MANIFEST_NAME);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::warn!("ignoring unreadable staging manifest: {}", e);
                None
            }
        }
    }
}

/// Result of executing a staging plan.
#[derive(Debug, Clone, Default)]
pub struct StageResult {
    /// Destinations that were copied (or would be, in a dry run)
    pub copied: Vec<PathBuf>,

    /// Destinations skipped because the staged copy is already current
    pub skipped: Vec<PathBuf>,

    /// Total bytes copied
    pub total_bytes: u64,
}

/// Execute the staging actions of a resolved plan.
pub fn stage(plan: &ResolutionPlan, opts: &StageOptions) -> Result<StageResult> {
    let previous: BTreeMap<PathBuf, String> = StagingManifest::load(&opts.output_dir)
        .map(|m| {
            m.files
                .into_iter()
                .map(|f| (f.destination, f.sha256))
                .collect()
        })
        .unwrap_or_default();

    if !opts.dry_run {
        ensure_dir(&opts.output_dir)?;
    }

    let mut result = StageResult::default();
    let mut manifest = StagingManifest::new(plan.platform.to_string());

    for copy in &plan.staging {
        let source_str = copy.source.to_string_lossy();

        if has_glob_meta(&source_str) {
            let matches = expand_glob(&source_str)?;
            if matches.is_empty() {
                bail!("no files match staging pattern: {}", copy.source.display());
            }
            for source in matches {
                let file_name = source
                    .file_name()
                    .with_context(|| format!("no file name in {}", source.display()))?;
                let destination = copy.destination.join(file_name);
                stage_file(&source, &destination, &previous, opts, &mut result, &mut manifest)?;
            }
        } else if copy.source.is_dir() {
            // Bundle directories are copied wholesale; per-file change
            // tracking is not worth it for frameworks.
            if opts.dry_run {
                tracing::info!(
                    "[dry-run] Would copy {} -> {}",
                    copy.source.display(),
                    copy.destination.display()
                );
            } else {
                result.total_bytes += copy_dir_all(&copy.source, &copy.destination)?;
            }
            result.copied.push(copy.destination.clone());
        } else {
            stage_file(
                &copy.source,
                &copy.destination,
                &previous,
                opts,
                &mut result,
                &mut manifest,
            )?;
        }
    }

    if opts.write_manifest && !opts.dry_run {
        let path = opts.output_dir.join(STAGING_MANIFEST_NAME);
        let json = serde_json::to_string_pretty(&manifest)
            .context("failed to serialize staging manifest")?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write manifest: {}", path.display()))?;
        tracing::debug!("Wrote staging manifest: {}", path.display());
    }

    tracing::info!(
        "Staged {} files ({} bytes), {} up to date",
        result.copied.len(),
        result.total_bytes,
        result.skipped.len()
    );

    Ok(result)
}

/// Stage a single file, skipping the copy when the recorded digest matches.
fn stage_file(
    source: &Path,
    destination: &Path,
    previous: &BTreeMap<PathBuf, String>,
    opts: &StageOptions,
    result: &mut StageResult,
    manifest: &mut StagingManifest,
) -> Result<()> {
    if !source.exists() {
        bail!("staging source does not exist: {}", source.display());
    }

    // A destination that is an existing directory takes the source's file
    // name, matching how declared destinations may name just a directory.
    let destination = if destination.is_dir() {
        let file_name = source
            .file_name()
            .with_context(|| format!("no file name in {}", source.display()))?;
        destination.join(file_name)
    } else {
        destination.to_path_buf()
    };

    let digest = sha256_file(source)?;
    let size = fs::metadata(source)
        .with_context(|| format!("failed to stat {}", source.display()))?
        .len();

    let up_to_date =
        destination.exists() && previous.get(&destination).map(String::as_str) == Some(&digest);

    if up_to_date {
        tracing::debug!("Up to date: {}", destination.display());
        result.skipped.push(destination.clone());
    } else if opts.dry_run {
        tracing::info!(
            "[dry-run] Would copy {} -> {}",
            source.display(),
            destination.display()
        );
        result.copied.push(destination.clone());
    } else {
        copy_file(source, &destination)?;
        tracing::debug!("Copied {} -> {}", source.display(), destination.display());
        result.copied.push(destination.clone());
        result.total_bytes += size;
    }

    manifest.files.push(StagedFile {
        source: source.to_path_buf(),
        destination,
        sha256: digest,
        size,
    });

    Ok(())
}
