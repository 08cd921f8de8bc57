//! CLI argument definitions for the cfgtree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and edit JSON configuration trees
#[derive(Parser, Debug)]
#[command(name = "cfgtree")]
#[command(about = "cfgtree: inspect and edit hierarchical configuration files")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of human-readable text
    #[arg(long, global = true, env = "CFGTREE_JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the whole configuration
    Show(ShowArgs),
    /// Print the value or subtree at a dotted path
    Get(GetArgs),
    /// Apply `path=value` assignments and write the file back
    Set(SetArgs),
    /// List every leaf with its dotted path
    Leaves(LeavesArgs),
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Configuration file (a JSON object)
    pub file: PathBuf,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Configuration file (a JSON object)
    pub file: PathBuf,

    /// Dotted path, e.g. `db.port`
    pub path: String,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration file (a JSON object)
    pub file: PathBuf,

    /// One or more `path=value` expressions
    #[arg(required = true)]
    pub assignments: Vec<String>,

    /// Store every value as text instead of reading it as the existing type
    #[arg(long)]
    pub no_deduce: bool,

    /// Print the result instead of writing the file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the leaves command
#[derive(clap::Args, Debug)]
pub struct LeavesArgs {
    /// Configuration file (a JSON object)
    pub file: PathBuf,
}
