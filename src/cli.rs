use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "achievement-explorer", version, about = "Browse games and their achievements")]
pub struct Cli {
    /// Catalog backend base URL (overrides the settings file and environment)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Settings file (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs here instead of the default location
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Search the catalog once and print the entries as JSON
    Search { query: String },
    /// Print the achievement list of one game as JSON
    Achievements { appid: u64 },
    /// Print the guide search URL for an achievement
    Guide { achievement: String, game: String },
}
