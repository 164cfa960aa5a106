//! The descriptor resolution algorithm.
//!
//! Resolution maps one platform's descriptor to a concrete plan:
//!
//! 1. look up the descriptor (absence is `UnsupportedPlatform`)
//! 2. validate its structure (`InvalidDescriptor` names the field)
//! 3. substitute `$(NAME)` placeholders eagerly in every path
//! 4. fan `{arch}` templates out over the declared architecture list
//! 5. pair every delay-load entry with exactly one staging copy
//! 6. on bundle platforms, emit a bundle reference plus inner staging copies
//! 7. surface the auxiliary manifest as a side output
//!
//! In strict mode every resolved path is checked for existence through the
//! injected [`ArtifactSource`]; lenient mode downgrades a missing artifact
//! to a warning. Staging sources containing glob metacharacters are checked
//! at staging time instead, when the pattern is expanded.

use std::path::{Path, PathBuf};

use crate::core::descriptor::{DescriptorSet, ARCH_TOKEN};
use crate::core::plan::{ResolutionPlan, ResolvedBundle, StagingCopy};
use crate::core::platform::PlatformTarget;
use crate::resolver::artifacts::ArtifactSource;
use crate::resolver::errors::ResolveError;
use crate::resolver::substitute::PlaceholderEnv;

/// Artifact validation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Missing artifacts abort resolution (the default)
    #[default]
    Strict,

    /// Missing artifacts are logged as warnings, for local iteration
    Lenient,
}

/// Options controlling a resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Artifact validation policy
    pub mode: CheckMode,

    /// Directory synthesized staging destinations land in
    pub output_dir: PathBuf,
}

impl ResolveOptions {
    /// Create strict options with the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ResolveOptions {
            mode: CheckMode::Strict,
            output_dir: output_dir.into(),
        }
    }

    /// Set the validation mode.
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Resolves descriptor sets into plans.
///
/// Holds no mutable state; safe to invoke concurrently for different
/// targets once the descriptor set is loaded.
pub struct Resolver<'a> {
    artifacts: &'a dyn ArtifactSource,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given artifact source.
    pub fn new(artifacts: &'a dyn ArtifactSource, options: ResolveOptions) -> Self {
        Resolver { artifacts, options }
    }

    /// Resolve the descriptor for `platform` into a plan.
    pub fn resolve(
        &self,
        set: &DescriptorSet,
        platform: PlatformTarget,
        env: &PlaceholderEnv,
    ) -> Result<ResolutionPlan, ResolveError> {
        let descriptor = set
            .get(platform)
            .ok_or_else(|| ResolveError::UnsupportedPlatform {
                platform,
                declared: set.declared_platforms(),
            })?;

        if let Some(issue) = descriptor.validate(platform).into_iter().next() {
            return Err(ResolveError::InvalidDescriptor {
                platform,
                field: issue.field,
                reason: issue.message,
            });
        }

        tracing::debug!("resolving `{}` for {}", set.package.name, platform);

        let mut plan = ResolutionPlan::new(platform);
        let archs = descriptor.effective_architectures(platform);

        // Include paths, declared order preserved (compiler search order is
        // order-sensitive).
        for entry in &descriptor.include_paths {
            let path = self.substitute(platform, "include_paths", env, entry)?;
            self.check_artifact(platform, "include_paths", &path)?;
            push_unique(&mut plan.include_paths, path);
        }

        // Static/import libraries, with architecture fan-out.
        for template in &descriptor.libraries {
            for path in self.expand(platform, "libraries", env, template, &archs)? {
                self.check_artifact(platform, "libraries", &path)?;
                push_unique(&mut plan.link_libraries, path);
            }
        }

        // Declared runtime dependencies, pre-resolved so delay-load pairing
        // can consume matching entries.
        let mut runtime_pairs: Vec<(StagingCopy, bool)> = Vec::new();
        for dep in &descriptor.runtime_dependencies {
            let sources =
                self.expand(platform, "runtime_dependencies", env, &dep.source, &archs)?;
            let destinations =
                self.expand(platform, "runtime_dependencies", env, &dep.destination, &archs)?;

            // A single destination (no `{arch}`) receives every fanned-out
            // source; otherwise the two lists must line up one to one.
            if destinations.len() == 1 {
                let destination = &destinations[0];
                for source in sources {
                    runtime_pairs.push((
                        StagingCopy {
                            source,
                            destination: destination.clone(),
                        },
                        false,
                    ));
                }
            } else if destinations.len() == sources.len() {
                for (source, destination) in sources.into_iter().zip(destinations) {
                    runtime_pairs.push((StagingCopy { source, destination }, false));
                }
            } else {
                return Err(ResolveError::InvalidDescriptor {
                    platform,
                    field: "runtime_dependencies",
                    reason: format!(
                        "`{}` expands to {} paths but `{}` expands to {}",
                        dep.source,
                        sources.len(),
                        dep.destination,
                        destinations.len()
                    ),
                });
            }
        }

        // Delay-load entries. Every entry gets exactly one staging copy: a
        // declared runtime dependency with the same source wins, otherwise a
        // copy into the output directory is synthesized. All declared pairs
        // sharing the source are consumed so none is staged a second time.
        for template in &descriptor.delay_load_libraries {
            for path in self.expand(platform, "delay_load_libraries", env, template, &archs)? {
                self.check_artifact(platform, "delay_load_libraries", &path)?;

                if plan.delay_load.contains(&path) {
                    continue;
                }

                let mut matched: Option<StagingCopy> = None;
                for (pair, consumed) in runtime_pairs.iter_mut() {
                    if pair.source == path {
                        if matched.is_none() {
                            matched = Some(pair.clone());
                        }
                        *consumed = true;
                    }
                }

                let copy = match matched {
                    Some(copy) => copy,
                    None => {
                        let file_name = path.file_name().ok_or_else(|| {
                            ResolveError::InvalidDescriptor {
                                platform,
                                field: "delay_load_libraries",
                                reason: format!("`{}` has no file name", path.display()),
                            }
                        })?;
                        StagingCopy {
                            source: path.clone(),
                            destination: self.options.output_dir.join(file_name),
                        }
                    }
                };

                plan.delay_load.push(path);
                push_staging(&mut plan.staging, copy);
            }
        }

        // Remaining declared runtime dependencies, declared order preserved.
        for (pair, consumed) in runtime_pairs {
            if consumed {
                continue;
            }
            self.check_artifact(platform, "runtime_dependencies", &pair.source)?;
            push_staging(&mut plan.staging, pair);
        }

        // Bundle platforms get one bundle reference; the bundle's inner
        // binary/manifest paths become staging entries.
        if let Some(spec) = &descriptor.bundle {
            let bundle_path = self.substitute(platform, "bundle", env, &spec.path)?;
            self.check_artifact(platform, "bundle", &bundle_path)?;

            for inner in &spec.inner_paths {
                let inner = self.substitute(platform, "bundle", env, inner)?;
                let source = bundle_path.join(&inner);
                self.check_artifact(platform, "bundle", &source)?;
                push_staging(
                    &mut plan.staging,
                    StagingCopy {
                        source,
                        destination: self.options.output_dir.join(&inner),
                    },
                );
            }

            plan.bundle = Some(ResolvedBundle {
                name: spec.name.clone(),
                path: bundle_path,
            });
        }

        // Side output for a separate pipeline stage (e.g. plugin merge).
        if let Some(manifest) = &descriptor.auxiliary_manifest {
            let path = self.substitute(platform, "auxiliary_manifest", env, manifest)?;
            self.check_artifact(platform, "auxiliary_manifest", &path)?;
            plan.auxiliary_manifest = Some(path);
        }

        tracing::debug!(
            "resolved {} actions for {} ({} staged)",
            plan.action_count(),
            platform,
            plan.staging.len()
        );

        Ok(plan)
    }

    /// Substitute placeholders in one descriptor entry.
    fn substitute(
        &self,
        platform: PlatformTarget,
        field: &'static str,
        env: &PlaceholderEnv,
        entry: &str,
    ) -> Result<PathBuf, ResolveError> {
        env.substitute(entry)
            .map(PathBuf::from)
            .map_err(|e| ResolveError::InvalidDescriptor {
                platform,
                field,
                reason: e.to_string(),
            })
    }

    /// Substitute placeholders and fan `{arch}` templates out over the
    /// architecture list. Templates without the token expand to themselves.
    fn expand(
        &self,
        platform: PlatformTarget,
        field: &'static str,
        env: &PlaceholderEnv,
        template: &str,
        archs: &[String],
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let substituted = self.substitute(platform, field, env, template)?;
        let substituted = substituted.to_string_lossy().into_owned();

        if !substituted.contains(ARCH_TOKEN) {
            return Ok(vec![PathBuf::from(substituted)]);
        }

        Ok(archs
            .iter()
            .map(|arch| PathBuf::from(substituted.replace(ARCH_TOKEN, arch)))
            .collect())
    }

    /// Enforce the existence invariant for one resolved path.
    ///
    /// Glob sources are skipped here; they are expanded (and missing matches
    /// reported) by the staging step.
    fn check_artifact(
        &self,
        platform: PlatformTarget,
        field: &'static str,
        path: &Path,
    ) -> Result<(), ResolveError> {
        if has_glob_meta(path) || self.artifacts.exists(path) {
            return Ok(());
        }

        match self.options.mode {
            CheckMode::Strict => Err(ResolveError::MissingArtifact {
                platform,
                field,
                path: path.to_path_buf(),
            }),
            CheckMode::Lenient => {
                tracing::warn!("missing artifact ({}): {}", field, path.display());
                Ok(())
            }
        }
    }
}

fn has_glob_meta(path: &Path) -> bool {
    crate::util::fs::has_glob_meta(&path.to_string_lossy())
}

fn push_unique(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

fn push_staging(list: &mut Vec<StagingCopy>, copy: StagingCopy) {
    if !list.contains(&copy) {
        list.push(copy);
    }
}
