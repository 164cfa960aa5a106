//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::platform::PlatformTarget;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during descriptor resolution.
///
/// Every variant names enough context (platform, field, path) for the
/// invoking build step to act on. There are no retries: resolution is a
/// one-shot deterministic computation, and a missing artifact will not
/// appear by retrying.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no descriptor for platform `{platform}`")]
    UnsupportedPlatform {
        platform: PlatformTarget,
        declared: Vec<PlatformTarget>,
    },

    #[error("invalid descriptor for `{platform}` (field `{field}`): {reason}")]
    InvalidDescriptor {
        platform: PlatformTarget,
        field: &'static str,
        reason: String,
    },

    #[error("missing artifact for `{platform}` (field `{field}`): {}", path.display())]
    MissingArtifact {
        platform: PlatformTarget,
        field: &'static str,
        path: PathBuf,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnsupportedPlatform { platform, declared } => {
                let mut diag =
                    Diagnostic::error(format!("no descriptor for platform `{}`", platform));

                if declared.is_empty() {
                    diag = diag.with_context("the manifest declares no platforms at all");
                } else {
                    let names: Vec<&str> = declared.iter().map(|p| p.as_str()).collect();
                    diag = diag
                        .with_context(format!("declared platforms: {}", names.join(", ")));
                }

                diag.with_suggestion(format!(
                    "Add a `[platforms.{}]` section to the manifest",
                    platform
                ))
                .with_suggestion(suggestions::PLATFORM_NOT_DECLARED)
            }

            ResolveError::InvalidDescriptor {
                platform,
                field,
                reason,
            } => Diagnostic::error(format!("invalid descriptor for `{}`", platform))
                .with_context(format!("field `{}`: {}", field, reason))
                .with_suggestion(format!(
                    "Fix the `{}` entry under `[platforms.{}]`",
                    field, platform
                )),

            ResolveError::MissingArtifact {
                platform,
                field,
                path,
            } => Diagnostic::error(format!(
                "artifact declared for `{}` does not exist on disk",
                platform
            ))
            .with_context(format!("field `{}`: {}", field, path.display()))
            .with_suggestion("Check that the SDK drop is complete and extracted")
            .with_suggestion(suggestions::MISSING_ARTIFACT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_diagnostic() {
        let err = ResolveError::UnsupportedPlatform {
            platform: PlatformTarget::Ios,
            declared: vec![PlatformTarget::Win64, PlatformTarget::Android],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("no descriptor for platform `ios`"));
        assert!(output.contains("win64, android"));
        assert!(output.contains("[platforms.ios]"));
        assert!(output.contains("stevedore platforms"));
    }

    #[test]
    fn test_missing_artifact_diagnostic() {
        let err = ResolveError::MissingArtifact {
            platform: PlatformTarget::Win64,
            field: "libraries",
            path: PathBuf::from("/sdk/Windows/lib/Win64/ImSDK.lib"),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("does not exist on disk"));
        assert!(output.contains("ImSDK.lib"));
        assert!(output.contains("--lenient"));
    }
}
