//! Core data structures for Stevedore.
//!
//! This module contains the foundational types:
//! - Platform targets and architecture handling
//! - Dependency descriptors and the manifest that declares them
//! - Resolution plans handed to the host build pipeline

pub mod descriptor;
pub mod plan;
pub mod platform;

pub use descriptor::{
    find_manifest, BundleSpec, DependencyDescriptor, DescriptorSet, PackageMetadata,
    RuntimeDependency, MANIFEST_NAME,
};
pub use plan::{ResolutionPlan, ResolvedBundle, StagingCopy};
pub use platform::PlatformTarget;
