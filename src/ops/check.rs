//! Manifest health check.
//!
//! Validates every declared platform descriptor and runs a full resolution
//! for each, reporting structural issues and missing artifacts in one pass.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::platform::PlatformTarget;
use crate::ops::plan::{load_descriptor_set, resolve_platform_in, PlanError, PlanOptions};
use crate::resolver::CheckMode;

/// Options for checking a manifest.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Explicit manifest path; discovered from the working directory if unset
    pub manifest_path: Option<PathBuf>,

    /// Directory used for synthesized staging destinations
    pub output_dir: PathBuf,

    /// Artifact validation policy
    pub mode: CheckMode,

    /// Extra placeholder definitions
    pub defines: Vec<(String, String)>,

    /// Check only this platform instead of every declared one
    pub platform: Option<PlatformTarget>,
}

impl CheckOptions {
    /// Create strict options with the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        CheckOptions {
            manifest_path: None,
            output_dir: output_dir.into(),
            mode: CheckMode::Strict,
            defines: Vec::new(),
            platform: None,
        }
    }
}

/// Check outcome for one platform.
#[derive(Debug, Clone)]
pub struct PlatformReport {
    /// The platform checked
    pub platform: PlatformTarget,

    /// Problems found; empty means the platform resolved cleanly
    pub issues: Vec<String>,

    /// Number of resolved actions, when resolution succeeded
    pub actions: Option<usize>,
}

impl PlatformReport {
    /// Whether this platform resolved without issues.
    pub fn ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check outcome for the whole manifest.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Package name from the manifest
    pub package: String,

    /// Per-platform outcomes, in platform order
    pub reports: Vec<PlatformReport>,
}

impl CheckReport {
    /// Whether every checked platform resolved without issues.
    pub fn ok(&self) -> bool {
        self.reports.iter().all(PlatformReport::ok)
    }

    /// Number of platforms with issues.
    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.ok()).count()
    }
}

/// Check the manifest's declared platforms.
pub fn check(opts: &CheckOptions) -> Result<CheckReport> {
    let set = load_descriptor_set(opts.manifest_path.as_deref())?;

    let platforms: Vec<PlatformTarget> = match opts.platform {
        Some(platform) => vec![platform],
        None => set.declared_platforms(),
    };

    let plan_opts = PlanOptions {
        manifest_path: opts.manifest_path.clone(),
        output_dir: opts.output_dir.clone(),
        mode: opts.mode,
        defines: opts.defines.clone(),
    };

    let mut reports = Vec::new();
    for platform in platforms {
        let mut issues: Vec<String> = match set.get(platform) {
            Some(descriptor) => descriptor
                .validate(platform)
                .into_iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect(),
            None => vec!["platform is not declared in the manifest".to_string()],
        };

        let mut actions = None;
        if issues.is_empty() {
            match resolve_platform_in(&set, &plan_opts, platform) {
                Ok(plan) => actions = Some(plan.action_count()),
                Err(PlanError::Resolve(e)) => issues.push(e.to_string()),
                Err(PlanError::Other(e)) => issues.push(e.to_string()),
            }
        }

        reports.push(PlatformReport {
            platform,
            issues,
            actions,
        });
    }

    Ok(CheckReport {
        package: set.package.name.clone(),
        reports,
    })
}

/// Format a check report for display.
pub fn format_report(report: &CheckReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "Checking `{}`", report.package).unwrap();
    writeln!(output).unwrap();

    for platform in &report.reports {
        let status = if platform.ok() { "[OK]" } else { "[!!]" };
        match platform.actions {
            Some(actions) if verbose => {
                writeln!(output, "  {} {} ({} actions)", status, platform.platform, actions)
                    .unwrap();
            }
            _ => writeln!(output, "  {} {}", status, platform.platform).unwrap(),
        }
        for issue in &platform.issues {
            writeln!(output, "      {}", issue).unwrap();
        }
    }

    writeln!(output).unwrap();
    if report.ok() {
        writeln!(output, "All {} platform(s) resolved.", report.reports.len()).unwrap();
    } else {
        writeln!(
            output,
            "{} of {} platform(s) failed.",
            report.failed_count(),
            report.reports.len()
        )
        .unwrap();
    }

    output
}
