//! Dependency descriptor resolution.
//!
//! The resolver maps (descriptor set, platform target, substitution
//! environment) to a concrete ResolutionPlan. It is a pure computation apart
//! from optional artifact existence checks, which go through the injected
//! [`ArtifactSource`] capability so resolution is testable without a real
//! filesystem.

pub mod artifacts;
pub mod errors;
pub mod resolve;
pub mod substitute;

pub use artifacts::{ArtifactSource, FsArtifacts, InMemoryArtifacts};
pub use errors::ResolveError;
pub use resolve::{CheckMode, ResolveOptions, Resolver};
pub use substitute::{PlaceholderEnv, SubstituteError};
