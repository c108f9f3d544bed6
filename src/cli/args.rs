//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

/// Generate secrets and firmware headers for fob builds.
#[derive(Parser, Debug)]
#[command(
    name = "fobgen",
    version = fobgen::constants::VERSION,
    about = "Generate secrets and firmware headers for fob builds",
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (default: ./fobgen.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Create or update the secret store with a fresh feature-unlock key.
    GlobalSecrets(GlobalSecretsArgs),

    /// Write the fob secrets header.
    Header(HeaderArgs),

    /// Print version and build information.
    Version,
}

/// Arguments for the `global-secrets` subcommand.
#[derive(Parser, Debug)]
pub struct GlobalSecretsArgs {
    /// Secret store to create or update.
    #[arg(long)]
    pub secret_file: Option<PathBuf>,

    /// JSON indent width for the rewritten store.
    #[arg(long)]
    pub indent: Option<usize>,
}

/// Arguments for the `header` subcommand.
#[derive(Parser, Debug)]
pub struct HeaderArgs {
    /// Header file to write.
    #[arg(long)]
    pub header_file: Option<PathBuf>,

    /// Build a fob paired to a car (requires --car-id and --pair-pin).
    #[arg(long, default_value_t = false, requires_all = ["car_id", "pair_pin"])]
    pub paired: bool,

    /// Numeric id of the paired car.
    #[arg(long, requires = "paired")]
    pub car_id: Option<u64>,

    /// Pairing PIN; its MD5 digest is embedded in the header.
    #[arg(long, requires = "paired", allow_hyphen_values = true)]
    pub pair_pin: Option<String>,

    /// Secret store holding the feature-unlock key and car secrets (paired only).
    #[arg(long)]
    pub secret_file: Option<PathBuf>,
}
