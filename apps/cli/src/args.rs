//! Command-line interface definitions.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "addrmeta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolve postal address metadata for a region")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Options shared by every subcommand. Each one overrides the settings file.
#[derive(Debug, Args)]
pub(crate) struct GlobalArgs {
    /// Settings file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Directory of the persisted payload store
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Do not read or write the persisted payload store
    #[arg(long, global = true)]
    pub(crate) no_store: bool,

    /// Base URL of the metadata server (needs the `http` feature)
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// JSON bundle mapping key strings to payloads
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) bundle: Option<PathBuf>,

    /// Inherit from the compiled-in default rule instead of fetching `data`
    #[arg(long, global = true)]
    pub(crate) builtin_default: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Resolve every level of a key and print its rules
    Lookup {
        /// Key string, e.g. `data/CH/BE` or `data/CA--fr`
        key: String,
    },
    /// Print the key string of each level without resolving anything
    Keys {
        /// Key string, e.g. `data/CH/BE`
        key: String,
    },
    /// Resolve a region and everything below it into the cache and store
    Preload {
        /// Key string of the region root, e.g. `data/CH`
        region: String,
    },
}
