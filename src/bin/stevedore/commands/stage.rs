//! `stevedore stage` command

use anyhow::Result;

use crate::cli::StageArgs;
use crate::commands::{check_mode, parse_platform, Globals};
use stevedore::ops::plan::{resolve_platform, PlanError, PlanOptions};
use stevedore::ops::stage::{stage, StageOptions};
use stevedore::util::diagnostic;
use stevedore::util::diagnostic::{suggestions, Diagnostic};

pub fn execute(globals: &Globals, args: &StageArgs) -> Result<()> {
    let platform = parse_platform(&args.platform)?;

    let plan_opts = PlanOptions {
        manifest_path: globals.manifest_path.clone(),
        output_dir: args.out_dir.clone(),
        mode: check_mode(args.lenient),
        defines: globals.defines.clone(),
    };

    let plan = match resolve_platform(&plan_opts, platform) {
        Ok(plan) => plan,
        Err(PlanError::Resolve(e)) => {
            diagnostic::emit(&e.to_diagnostic(), !globals.no_color);
            std::process::exit(1);
        }
        Err(PlanError::Other(e)) => return Err(e),
    };

    if plan.staging.is_empty() {
        println!("Nothing to stage for {}.", platform);
        return Ok(());
    }

    let stage_opts = StageOptions::new(&args.out_dir).with_dry_run(args.dry_run);
    let result = match stage(&plan, &stage_opts) {
        Ok(result) => result,
        Err(e) => {
            let diagnostic = Diagnostic::error(format!("staging failed for {}", platform))
                .with_context(format!("{:#}", e))
                .with_suggestion(suggestions::STAGE_FAILED);
            diagnostic::emit(&diagnostic, !globals.no_color);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        println!(
            "[dry-run] Would stage {} file(s) into {}",
            result.copied.len(),
            args.out_dir.display()
        );
    } else {
        println!(
            "Staged {} file(s) ({} bytes) into {}, {} up to date",
            result.copied.len(),
            result.total_bytes,
            args.out_dir.display(),
            result.skipped.len()
        );
    }

    Ok(())
}
