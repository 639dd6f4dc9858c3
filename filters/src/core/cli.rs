use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_VIEWS_DIR};
use crate::data::views::ViewMode;

#[derive(Parser)]
#[command(name = "fleetdesk")]
#[command(version, about = "Lead filter engine and saved views", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Directory holding saved views
    #[arg(long, global = true, env = ENV_VIEWS_DIR)]
    pub views_dir: Option<PathBuf>,
}

/// Parse view mode from CLI string
fn parse_view_mode(s: &str) -> Result<ViewMode, String> {
    s.parse()
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// List filterable fields with their types and operators
    Fields,
    /// Filter a JSON array of records and print the matches
    Eval {
        /// JSON file containing an array of records
        #[arg(long, short = 'r')]
        records: PathBuf,

        /// JSON file containing a filter tree
        #[arg(long, short = 'f', conflicts_with = "view", required_unless_present = "view")]
        filter: Option<PathBuf>,

        /// Saved view whose filter to apply
        #[arg(long)]
        view: Option<String>,

        /// Print only the number of matches
        #[arg(long)]
        count: bool,
    },
    /// Manage saved views
    Views {
        #[command(subcommand)]
        command: ViewCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ViewCommands {
    /// List saved views
    List,
    /// Print a saved view as JSON
    Show { id: String },
    /// Delete a saved view
    Delete { id: String },
    /// Create or update a saved view from a filter file
    Save {
        /// View id (letters, digits, '-' and '_')
        #[arg(long)]
        id: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,

        /// JSON file containing a filter tree
        #[arg(long, short = 'f')]
        filter: PathBuf,

        /// Visible columns, comma separated
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Presentation mode (table or kanban)
        #[arg(long, value_parser = parse_view_mode)]
        mode: Option<ViewMode>,

        /// Share the view with the team
        #[arg(long)]
        shared: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub views_dir: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        views_dir: cli.views_dir,
    };
    (config, cli.command)
}
