//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Declarative JMeter test-plan builder: compiles plan descriptions to .jmx files
#[derive(Parser, Debug)]
#[command(name = "jmxplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .jmxplan.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a plan description into a .jmx file
    Build {
        /// Plan description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        plan: PathBuf,
        /// Output file (default: <plan>.jmx, or <output_dir>/<stem>.jmx)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Validate a plan description without writing anything
    Check {
        /// Plan description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        plan: PathBuf,
    },

    /// Render a plan description as JMX to stdout
    Print {
        /// Plan description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        plan: PathBuf,
    },

    /// Show the element tree of a plan description
    Tree {
        /// Plan description (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        plan: PathBuf,
    },

    /// List element kinds, or the options of one kind
    Schema {
        /// Element kind, e.g. thread_group
        kind: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
