//! Stevedore - a resolver and staging planner for pre-built native SDKs.
//!
//! This crate provides the core library functionality for Stevedore:
//! per-platform dependency descriptors, resolution into concrete build
//! actions (include paths, link libraries, delay-load entries, staging
//! copies), and execution of the staging step.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

pub use crate::core::{
    descriptor::{DependencyDescriptor, DescriptorSet, RuntimeDependency},
    plan::{ResolutionPlan, StagingCopy},
    platform::PlatformTarget,
};

pub use crate::resolver::{ArtifactSource, CheckMode, ResolveError, Resolver};
