use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// suiteconf - layered rose-suite.conf configuration engine
#[derive(Parser, Debug)]
#[command(name = "suiteconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that merges a workflow config.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Workflow source directory holding rose-suite.conf
    pub source: PathBuf,

    /// Override a config value: KEY=VALUE, [SECTION]KEY=VALUE, [SECTION]~KEY,
    /// or name an optional config: NAME, (NAME)
    #[arg(short = 'D', long = "define", value_name = "DEFINE")]
    pub defines: Vec<String>,

    /// Override a template variable: KEY=VALUE
    #[arg(short = 'S', long = "define-suite", value_name = "DEFINE")]
    pub template_defines: Vec<String>,

    /// Optional config name(s); "(name)" may be missing
    #[arg(short = 'O', long = "opt-conf-key", value_name = "KEY")]
    pub opt_conf_keys: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the template variables handed to the workflow
    Vars {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Installed run directory (reads the options recorded there)
        #[arg(long)]
        run_dir: Option<PathBuf>,

        /// Cylc version exported as CYLC_VERSION (defaults to $CYLC_VERSION)
        #[arg(long)]
        cylc_version: Option<String>,
    },

    /// Print shell exports for the [env] section
    Env {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Installed run directory (reads the options recorded there)
        #[arg(long)]
        run_dir: Option<PathBuf>,

        /// Cylc version exported as CYLC_VERSION (defaults to $CYLC_VERSION)
        #[arg(long)]
        cylc_version: Option<String>,

        /// Print resolved NAME=VALUE pairs instead of export statements
        #[arg(long)]
        resolved: bool,
    },

    /// Print the merged rose-suite.conf
    Show {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Installed run directory (reads the options recorded there)
        #[arg(long)]
        run_dir: Option<PathBuf>,
    },

    /// Record command-line options in an installed run directory
    Install {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Run directory the workflow was installed into
        run_dir: PathBuf,

        /// Cylc version exported as CYLC_VERSION (defaults to $CYLC_VERSION)
        #[arg(long)]
        cylc_version: Option<String>,

        /// Forget options recorded by previous installs
        #[arg(long)]
        clear_install_options: bool,

        /// Skip the resolved config dump under log/conf/
        #[arg(long)]
        no_log_dump: bool,
    },
}
