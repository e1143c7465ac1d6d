use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::parser::CHARACTERS_FILE;
use crate::seed::{SeedOptions, SkipLog};

pub const DEFAULT_CONFIG_FILE: &str = "config/seed.toml";

/// Directories searched for the bundled data, relative to the working directory
const DATA_DIR_CANDIDATES: &[&str] = &["../src/data", "src/data", "data"];

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedSettings {
    pub data_dir: Option<PathBuf>,
    pub prune_stale: bool,
    pub missing_character: SkipLog,
    pub unknown_reference: SkipLog,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub database: DatabaseSettings,
    pub seed: SeedSettings,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `HSR_SEED__*` variables
    /// (e.g. `HSR_SEED__DATABASE__PATH`).
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let s = Config::builder()
            .set_default("environment", "development")?
            .set_default("database.path", "hsr_tools.db")?
            .set_default("seed.prune_stale", true)?
            .set_default("seed.missing_character", "silent")?
            .set_default("seed.unknown_reference", "warn")?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix("HSR_SEED").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() {
            "hsr_seed=warn"
        } else {
            "hsr_seed=info"
        }
    }

    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            missing_character: self.seed.missing_character,
            unknown_reference: self.seed.unknown_reference,
            prune_stale: self.seed.prune_stale,
        }
    }

    /// Configured data directory, or the first candidate holding the
    /// character list
    pub fn data_dir(&self) -> PathBuf {
        self.seed.data_dir.clone().unwrap_or_else(discover_data_dir)
    }
}

/// Find the bundled data directory. Falls back to `../src/data`.
pub fn discover_data_dir() -> PathBuf {
    discover_data_dir_in(Path::new("."))
}

fn discover_data_dir_in(base: &Path) -> PathBuf {
    DATA_DIR_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|dir| dir.join(CHARACTERS_FILE).exists())
        .unwrap_or_else(|| base.join(DATA_DIR_CANDIDATES[0]))
}
