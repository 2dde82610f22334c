//! Clap CLI definitions for the `scanfmt` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// scanfmt -- scan formula and field set tool.
///
/// Loads scan documents into field sets, prints the fields, and saves them
/// back as formulas.
#[derive(Parser, Debug)]
#[command(
    name = "scanfmt",
    about = "Scan formula and field set tool",
    long_about = "Loads scan formulas into flat field sets and saves them back. A formula only loads if every field can be expressed as one list of conditions.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: $SCANFMT_CONFIG, else scanfmt.yaml in this or a parent directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a scan document and print its fields.
    Fields(DocumentArgs),

    /// Load a scan document and print the re-saved formula.
    Resave(ResaveArgs),

    /// Check that a scan document loads and re-saves to an equal field set.
    Check(DocumentArgs),

    /// Show or create the configuration file.
    Config(ConfigArgs),
}

/// Arguments shared by commands that load one document.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Scan document (JSON or TOML).
    pub file: PathBuf,

    /// Reject conditions whose sub-field differs from their field's.
    #[arg(long)]
    pub strict_sub_fields: bool,
}

#[derive(Args, Debug)]
pub struct ResaveArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Also write the re-saved document as JSON to this path.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,

    /// Print the path of the config file in use.
    Path,

    /// Write a default scanfmt.yaml to the current directory.
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}
