//! suiteconf CLI - layered rose-suite.conf configuration engine
//!
//! Usage: suiteconf <COMMAND>
//!
//! Commands:
//!   vars     Print the template variables handed to the workflow
//!   env      Print shell exports for the [env] section
//!   show     Print the merged rose-suite.conf
//!   install  Record command-line options in a run directory

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use suiteconf::Config;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, warnings) = Config::load_or_default()?;
    init_tracing(cli.verbose, &config);

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Commands::Vars {
            overrides,
            run_dir,
            cylc_version,
        } => commands::cmd_vars(
            &overrides,
            run_dir.as_deref(),
            cylc_version,
            &config,
            cli.json,
        ),
        Commands::Env {
            overrides,
            run_dir,
            cylc_version,
            resolved,
        } => commands::cmd_env(
            &overrides,
            run_dir.as_deref(),
            cylc_version,
            resolved,
            &config,
            cli.json,
        ),
        Commands::Show { overrides, run_dir } => {
            commands::cmd_show(&overrides, run_dir.as_deref(), cli.json)
        }
        Commands::Install {
            overrides,
            run_dir,
            cylc_version,
            clear_install_options,
            no_log_dump,
        } => commands::cmd_install(
            &overrides,
            &run_dir,
            cylc_version,
            clear_install_options,
            no_log_dump,
            &config,
            cli.json,
        ),
    }
}

/// `RUST_LOG` wins, then `-v`, then the configured level.
fn init_tracing(verbose: u8, config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, &config.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

fn level_for(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
