//! Command-line interface for cnikit
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use cnikit::constants::{DEFAULT_CONF_DIR, DEFAULT_CONF_EXTENSIONS};
use std::path::PathBuf;

/// cnikit - inspect CNI network configurations and results
#[derive(Parser)]
#[command(name = "cnikit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding network configuration files
    #[arg(short = 'd', long, env = "NETCONFPATH", default_value = DEFAULT_CONF_DIR)]
    pub conf_dir: PathBuf,

    /// Recognized config file extensions (repeatable)
    #[arg(short, long = "ext", default_values_t = default_extensions())]
    pub extensions: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List configuration files in the config directory
    Files,

    /// Load a network by name from the config directory
    Load {
        /// Network name
        name: String,

        /// Print only a summary instead of the raw list
        #[arg(long)]
        summary: bool,
    },

    /// Parse a configuration file (list first, then single plugin)
    Show {
        /// Path to a .conf or .conflist file
        file: PathBuf,
    },

    /// Promote a single plugin file into a plugin list
    Promote {
        /// Path to a .conf file
        file: PathBuf,
    },

    /// Decode a plugin result and re-encode it in the current layout
    Result {
        /// Result file, or - for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn default_extensions() -> Vec<String> {
    DEFAULT_CONF_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "cnikit", &mut std::io::stdout());
    }
}
