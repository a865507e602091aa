//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::ToggleEvent;

/// Tri-state selection sync for organisation trees
#[derive(Parser, Debug)]
#[command(name = "orgsel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .orgsel.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "ORGSEL_CONFIG_DIR", value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tree with selection markers
    Show {
        /// Tree definition (default: configured tree_file, else demo)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Replay select/unselect events and show the result
    ///
    /// Events are node paths prefixed with '+' (select) or '-' (unselect),
    /// e.g. '+Organisation A/Team A/Employee 1'. Options go before events.
    Toggle {
        /// Tree definition (default: configured tree_file, else demo)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Print only the selected paths
        #[arg(short, long)]
        selected_only: bool,

        /// Events, applied in order
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        events: Vec<ToggleEvent>,
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
    },

    /// Show config paths
    Path,
}
