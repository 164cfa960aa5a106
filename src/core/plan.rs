//! Resolution plans.
//!
//! A ResolutionPlan is the output of resolving a descriptor set for one
//! platform: the four ordered action lists plus the optional bundle
//! reference and auxiliary manifest. The plan is computed fresh per build
//! invocation and handed to the host pipeline; the resolver itself never
//! copies, links or writes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformTarget;

/// A single staging copy: place `source` at `destination` so the artifact
/// is colocated with the build output at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingCopy {
    /// Artifact on disk (may be a glob pattern or a directory)
    pub source: PathBuf,

    /// Where the artifact must live next to the build output
    pub destination: PathBuf,
}

/// A resolved bundle/framework reference for bundle-based platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBundle {
    /// Logical bundle name
    pub name: String,

    /// Bundle location on disk
    pub path: PathBuf,
}

/// The complete, validated set of build actions for one platform target.
///
/// Invariants upheld by the resolver:
/// - no duplicate entries within any list
/// - every delay-load entry has exactly one staging copy with the same source
/// - ordering is deterministic (declared order, first occurrence wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    /// Platform this plan was resolved for
    pub platform: PlatformTarget,

    /// Include directories, in compiler search order
    pub include_paths: Vec<PathBuf>,

    /// Libraries for the linker's library list
    pub link_libraries: Vec<PathBuf>,

    /// Shared libraries bound at first use instead of program load
    pub delay_load: Vec<PathBuf>,

    /// Runtime artifacts to stage beside the build output
    pub staging: Vec<StagingCopy>,

    /// Bundle reference (bundle-based platforms only)
    pub bundle: Option<ResolvedBundle>,

    /// Side output consumed by a separate pipeline stage, not merged into
    /// the four main lists
    pub auxiliary_manifest: Option<PathBuf>,
}

impl ResolutionPlan {
    /// Create an empty plan for a platform.
    pub fn new(platform: PlatformTarget) -> Self {
        ResolutionPlan {
            platform,
            include_paths: Vec::new(),
            link_libraries: Vec::new(),
            delay_load: Vec::new(),
            staging: Vec::new(),
            bundle: None,
            auxiliary_manifest: None,
        }
    }

    /// Check if the plan contains no actions at all.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.link_libraries.is_empty()
            && self.delay_load.is_empty()
            && self.staging.is_empty()
            && self.bundle.is_none()
            && self.auxiliary_manifest.is_none()
    }

    /// Total number of actions across all lists.
    pub fn action_count(&self) -> usize {
        self.include_paths.len()
            + self.link_libraries.len()
            + self.delay_load.len()
            + self.staging.len()
            + usize::from(self.bundle.is_some())
            + usize::from(self.auxiliary_manifest.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan() {
        let plan = ResolutionPlan::new(PlatformTarget::Linux);
        assert!(plan.is_empty());
        assert_eq!(plan.action_count(), 0);
    }

    #[test]
    fn test_action_count() {
        let mut plan = ResolutionPlan::new(PlatformTarget::Win64);
        plan.include_paths.push(PathBuf::from("include"));
        plan.link_libraries.push(PathBuf::from("ImSDK.lib"));
        plan.delay_load.push(PathBuf::from("ImSDK.dll"));
        plan.staging.push(StagingCopy {
            source: PathBuf::from("ImSDK.dll"),
            destination: PathBuf::from("out/ImSDK.dll"),
        });
        assert_eq!(plan.action_count(), 4);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_plan_json_round_trip() {
        let mut plan = ResolutionPlan::new(PlatformTarget::Android);
        plan.link_libraries.push(PathBuf::from("libs/arm64-v8a/libImSDK.so"));
        plan.auxiliary_manifest = Some(PathBuf::from("APL_imsdk.xml"));

        let json = serde_json::to_string(&plan).unwrap();
        let back: ResolutionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
