//! High-level operations.
//!
//! This module contains the implementation of stevedore commands.

pub mod check;
pub mod plan;
pub mod stage;

pub use check::{check, format_report, CheckOptions, CheckReport, PlatformReport};
pub use plan::{build_env, load_descriptor_set, resolve_platform, PlanError, PlanOptions};
pub use stage::{
    stage, StageOptions, StageResult, StagedFile, StagingManifest, STAGING_MANIFEST_NAME,
};
