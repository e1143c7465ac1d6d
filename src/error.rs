use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage, used to tag fatal errors and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Schema,
    Elements,
    Paths,
    Characters,
    Skills,
    Builds,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Schema => write!(f, "schema"),
            Stage::Elements => write!(f, "elements"),
            Stage::Paths => write!(f, "paths"),
            Stage::Characters => write!(f, "characters"),
            Stage::Skills => write!(f, "skills"),
            Stage::Builds => write!(f, "builds"),
        }
    }
}

/// Errors that abort a seeding run. Per-record failures never surface here.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{stage}: failed to read {path:?}")]
    Read {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: failed to parse {path:?}")]
    Parse {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage}: failed to seed '{name}'")]
    Reference {
        stage: Stage,
        name: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{stage}: failed to load lookup table {table}")]
    Lookup {
        stage: Stage,
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("schema: failed on {table}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("schema: {0}")]
    Dependency(String),
}

impl SeedError {
    /// The stage the run was in when it aborted
    pub fn stage(&self) -> Stage {
        match self {
            SeedError::Read { stage, .. }
            | SeedError::Parse { stage, .. }
            | SeedError::Reference { stage, .. }
            | SeedError::Lookup { stage, .. } => *stage,
            SeedError::Schema { .. } | SeedError::Dependency(_) => Stage::Schema,
        }
    }
}
