use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::seed::{SeedOptions, SkipLog};

#[derive(Parser, Debug)]
#[command(name = "hsr-seed")]
#[command(version, about = "Create and seed the HSR tools database")]
pub struct Cli {
    /// SQLite database path (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create missing tables and indexes
    Migrate,

    /// Migrate, then seed reference data from the JSON data directory
    Seed(SeedArgs),

    /// Drop every table, migrate, then seed
    Fresh(SeedArgs),

    /// List all tables in creation order
    ListTables,
}

#[derive(Args, Debug, Default)]
pub struct SeedArgs {
    /// Directory containing characters.json, skills.json and optimal-builds.json
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Remove build sets/substats no longer listed in the source
    #[arg(long, conflicts_with = "keep_stale")]
    pub prune_stale: bool,

    /// Keep build sets/substats no longer listed in the source
    #[arg(long)]
    pub keep_stale: bool,

    /// How to report skill/build records for unknown characters
    #[arg(long, value_enum)]
    pub missing_character: Option<SkipLog>,

    /// How to report characters with an unknown element or path
    #[arg(long, value_enum)]
    pub unknown_reference: Option<SkipLog>,
}

impl SeedArgs {
    /// Apply flags given on the command line on top of configured options
    pub fn apply(&self, options: &mut SeedOptions) {
        if self.prune_stale {
            options.prune_stale = true;
        }
        if self.keep_stale {
            options.prune_stale = false;
        }
        if let Some(level) = self.missing_character {
            options.missing_character = level;
        }
        if let Some(level) = self.unknown_reference {
            options.unknown_reference = level;
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
