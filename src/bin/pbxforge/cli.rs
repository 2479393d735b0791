//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use pbxforge::util::shell::ColorChoice;

/// pbxforge - generate and surgically patch Xcode project manifests
#[derive(Parser)]
#[command(name = "pbxforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Emit machine-readable JSON events instead of status lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a complete project manifest from the source tree
    Generate(GenerateArgs),

    /// Splice new source files into an existing manifest
    Patch(PatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Product name (defaults to the [product] section of pbxforge.toml)
    pub name: Option<String>,

    /// Reverse-DNS bundle identifier
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Minimum iOS version
    #[arg(long)]
    pub deployment_target: Option<String>,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to pbxforge.toml under the root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Explicit source files, relative to the root (skips discovery)
    #[arg(long = "source", value_name = "PATH")]
    pub sources: Vec<String>,
}

#[derive(Args)]
pub struct PatchArgs {
    /// New source files, relative to the project root
    pub files: Vec<String>,

    /// Manifest to patch: the .xcodeproj bundle or the project.pbxproj inside it
    #[arg(long)]
    pub project: PathBuf,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the on-disk existence check for the new files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: CompletionShell,
}
