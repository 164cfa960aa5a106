//! `stevedore plan` command

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::PlanArgs;
use crate::commands::{check_mode, parse_platform, Globals};
use stevedore::core::ResolutionPlan;
use stevedore::ops::plan::{resolve_platform, PlanError, PlanOptions};
use stevedore::util::diagnostic;
use stevedore::util::diagnostic::Diagnostic;
use stevedore::util::fs::relative_path;

pub fn execute(globals: &Globals, args: &PlanArgs) -> Result<()> {
    let platform = parse_platform(&args.platform)?;

    let opts = PlanOptions {
        manifest_path: globals.manifest_path.clone(),
        output_dir: args.out_dir.clone(),
        mode: check_mode(args.lenient),
        defines: globals.defines.clone(),
    };

    let plan = match resolve_platform(&opts, platform) {
        Ok(plan) => plan,
        Err(PlanError::Resolve(e)) => {
            diagnostic::emit(&e.to_diagnostic(), !globals.no_color);
            std::process::exit(1);
        }
        Err(PlanError::Other(e)) => return Err(e),
    };

    if plan.is_empty() {
        diagnostic::emit(
            &Diagnostic::warning(format!("descriptor for {} declares no actions", platform)),
            !globals.no_color,
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }

    Ok(())
}

fn print_plan(plan: &ResolutionPlan) {
    // Paths are shown relative to the invocation directory where possible.
    let cwd = std::env::current_dir().unwrap_or_default();
    let rel = |path: &Path| -> PathBuf { relative_path(&cwd, path) };

    println!("Staging plan for {}:", plan.platform);
    println!();

    if !plan.include_paths.is_empty() {
        println!("  Include paths:");
        for path in &plan.include_paths {
            println!("    {}", rel(path).display());
        }
        println!();
    }

    if !plan.link_libraries.is_empty() {
        println!("  Link libraries:");
        for path in &plan.link_libraries {
            println!("    {}", rel(path).display());
        }
        println!();
    }

    if !plan.delay_load.is_empty() {
        println!("  Delay-load libraries:");
        for path in &plan.delay_load {
            println!("    {}", rel(path).display());
        }
        println!();
    }

    if let Some(bundle) = &plan.bundle {
        println!("  Bundle:");
        println!("    {} ({})", bundle.name, rel(&bundle.path).display());
        println!();
    }

    if !plan.staging.is_empty() {
        println!("  Staging copies:");
        for copy in &plan.staging {
            println!(
                "    {} -> {}",
                rel(&copy.source).display(),
                rel(&copy.destination).display()
            );
        }
        println!();
    }

    if let Some(manifest) = &plan.auxiliary_manifest {
        println!("  Auxiliary manifest:");
        println!("    {}", rel(manifest).display());
        println!();
    }

    if plan.is_empty() {
        println!("  (no actions)");
    } else {
        println!("  {} action(s) total", plan.action_count());
    }
}
