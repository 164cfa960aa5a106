//! `stevedore platforms` command

use anyhow::Result;

use crate::cli::PlatformsArgs;
use crate::commands::Globals;
use stevedore::ops::plan::load_descriptor_set;

pub fn execute(globals: &Globals, _args: &PlatformsArgs) -> Result<()> {
    let set = load_descriptor_set(globals.manifest_path.as_deref())?;

    println!("Platforms declared by `{}`:", set.package.name);
    println!();

    for platform in set.declared_platforms() {
        let descriptor = match set.get(platform) {
            Some(descriptor) => descriptor,
            None => continue,
        };

        let mut parts = Vec::new();
        if !descriptor.include_paths.is_empty() {
            parts.push(format!("{} include path(s)", descriptor.include_paths.len()));
        }
        if !descriptor.libraries.is_empty() {
            parts.push(format!("{} library(ies)", descriptor.libraries.len()));
        }
        if !descriptor.delay_load_libraries.is_empty() {
            parts.push(format!("{} delay-load", descriptor.delay_load_libraries.len()));
        }
        if !descriptor.runtime_dependencies.is_empty() {
            parts.push(format!(
                "{} runtime dep(s)",
                descriptor.runtime_dependencies.len()
            ));
        }
        if descriptor.bundle.is_some() {
            parts.push("bundle".to_string());
        }
        if descriptor.auxiliary_manifest.is_some() {
            parts.push("auxiliary manifest".to_string());
        }

        let archs = descriptor.effective_architectures(platform);
        if !archs.is_empty() {
            parts.push(format!("architectures: {}", archs.join(", ")));
        }

        if parts.is_empty() {
            println!("  {} (empty descriptor)", platform);
        } else {
            println!("  {}: {}", platform, parts.join(", "));
        }
    }

    Ok(())
}
