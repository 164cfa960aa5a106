//! `stevedore check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::{check_mode, parse_platform, Globals};
use stevedore::ops::check::{check, format_report, CheckOptions};

pub fn execute(globals: &Globals, args: &CheckArgs) -> Result<()> {
    let platform = match &args.platform {
        Some(name) => Some(parse_platform(name)?),
        None => None,
    };

    let opts = CheckOptions {
        manifest_path: globals.manifest_path.clone(),
        output_dir: args.out_dir.clone(),
        mode: check_mode(args.lenient),
        defines: globals.defines.clone(),
        platform,
    };

    let report = check(&opts)?;
    print!("{}", format_report(&report, true));

    if !report.ok() {
        std::process::exit(1);
    }

    Ok(())
}
