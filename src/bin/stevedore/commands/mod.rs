//! Command implementations

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::Cli;
use stevedore::core::PlatformTarget;
use stevedore::resolver::CheckMode;

pub mod check;
pub mod completions;
pub mod plan;
pub mod platforms;
pub mod stage;

/// Global flags shared by every subcommand.
pub struct Globals {
    pub no_color: bool,
    pub manifest_path: Option<PathBuf>,
    pub defines: Vec<(String, String)>,
}

impl Globals {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Globals {
            no_color: cli.no_color,
            manifest_path: cli.manifest_path.clone(),
            defines: parse_defines(&cli.define)?,
        })
    }
}

/// Parse `-D NAME=VALUE` definitions.
fn parse_defines(defines: &[String]) -> Result<Vec<(String, String)>> {
    let mut parsed = Vec::new();
    for define in defines {
        match define.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                parsed.push((name.to_string(), value.to_string()));
            }
            _ => bail!("invalid definition `{}`; expected NAME=VALUE", define),
        }
    }
    Ok(parsed)
}

/// Parse a platform argument.
pub fn parse_platform(name: &str) -> Result<PlatformTarget> {
    name.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Map the `--lenient` flag to a check mode.
pub fn check_mode(lenient: bool) -> CheckMode {
    if lenient {
        CheckMode::Lenient
    } else {
        CheckMode::Strict
    }
}
