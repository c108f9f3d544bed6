//! fobgen — build-time secret provisioning for fob and car firmware.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use fobgen::config;
use fobgen::constants;
use fobgen::header;
use fobgen::logging;
use fobgen::secrets;

use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use cli::args::{Cli, Command, GlobalSecretsArgs, HeaderArgs};
use config::Config;
use header::DeviceMode;
use secrets::GlobalSecretGenerator;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Command::GlobalSecrets(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_global_secrets(args, &config, cli.quiet)
        }
        Command::Header(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_header(args, &config, cli.quiet)
        }
        Command::Version => run_version(),
    }
}

/// Load `fobgen.toml` from `--config` or the working directory.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    Config::load(explicit, &cwd).context("failed to load config")
}

/// Print version and build information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}

/// Create or update the secret store with a fresh feature-unlock key.
fn run_global_secrets(args: GlobalSecretsArgs, config: &Config, quiet: bool) -> Result<()> {
    let Some(secret_file) = config.secret_file(args.secret_file.as_deref()) else {
        bail!("no secret store given; pass --secret-file or set [store] secret_file in the config");
    };
    let indent = config.indent(args.indent);

    let report = GlobalSecretGenerator::new()
        .indent(indent)
        .run(&secret_file)
        .with_context(|| format!("failed to generate global secrets in {}", secret_file.display()))?;

    if !quiet {
        let action = if report.created { "Created" } else { "Updated" };
        eprintln!(
            "  {} {} {}",
            "✓".green().bold(),
            action,
            secret_file.display().to_string().bold(),
        );
        if report.preserved > 0 {
            eprintln!(
                "    {}",
                format!("{} existing secret(s) preserved", report.preserved).dimmed()
            );
        }
    }

    Ok(())
}

/// Write the fob secrets header for the requested mode.
fn run_header(args: HeaderArgs, config: &Config, quiet: bool) -> Result<()> {
    let Some(header_file) = config.header_file(args.header_file.as_deref()) else {
        bail!("no header file given; pass --header-file or set [header] header_file in the config");
    };

    let mode = DeviceMode::from_flags(
        args.paired,
        args.car_id,
        args.pair_pin,
        config.secret_file(args.secret_file.as_deref()),
    )?;

    let header = header::emit_header(&mode, &header_file)
        .with_context(|| format!("failed to emit header {}", header_file.display()))?;

    if !quiet {
        let label = if mode.is_paired() {
            format!("paired to car {}", header.car_id())
        } else {
            "unpaired".to_string()
        };
        eprintln!(
            "  {} Wrote {} {}",
            "✓".green().bold(),
            header_file.display().to_string().bold(),
            format!("({label})").dimmed(),
        );
    }

    Ok(())
}
