//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Stevedore - resolver and stager for pre-built native SDK dependencies
#[derive(Parser)]
#[command(name = "stevedore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to stevedore.toml (searches parent directories by default)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    /// Define a placeholder, e.g. -D BinaryOutputDir=/staged
    #[arg(short = 'D', long = "define", global = true, value_name = "NAME=VALUE")]
    pub define: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a platform's descriptor and print the staging plan
    Plan(PlanArgs),

    /// Resolve a platform's descriptor and copy its artifacts
    Stage(StageArgs),

    /// Validate every declared platform in the manifest
    Check(CheckArgs),

    /// List the platforms declared in the manifest
    Platforms(PlatformsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Platform to resolve (win64, mac, linux, ios, android)
    pub platform: String,

    /// Staging output directory
    #[arg(long, default_value = "staged", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Downgrade missing artifacts to warnings
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args)]
pub struct StageArgs {
    /// Platform to stage (win64, mac, linux, ios, android)
    pub platform: String,

    /// Staging output directory
    #[arg(long, default_value = "staged", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// List actions without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Downgrade missing artifacts to warnings
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Check only this platform
    #[arg(long)]
    pub platform: Option<String>,

    /// Staging output directory used for synthesized destinations
    #[arg(long, default_value = "staged", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Downgrade missing artifacts to warnings
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args)]
pub struct PlatformsArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
