//! The seeding pipeline
//!
//! Stages run strictly in order, each depending on the rows written by the
//! previous one:
//! 1. elements and paths (fixed lookup rows)
//! 2. characters, resolving element/path names to lookup ids
//! 3. skills, one row per existing character
//! 4. builds, with substat weights and ranked relic sets
//!
//! Only unreadable/unparseable source files, lookup-table failures, and
//! reference-row write failures abort the run. Everything else is logged (or
//! not, per [`SkipLog`]) and skipped.

pub mod builds;
pub mod characters;
pub mod reference;
pub mod skills;

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{SeedError, Stage};
use crate::parser::{load_builds, load_characters, load_skills};
use crate::schema::CHARACTERS;
use crate::writer::SqliteWriter;

/// How a skipped record is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SkipLog {
    #[default]
    Silent,
    Debug,
    Warn,
}

impl SkipLog {
    pub fn emit(self, message: impl fmt::Display) {
        match self {
            SkipLog::Silent => {}
            SkipLog::Debug => debug!("{}", message),
            SkipLog::Warn => warn!("{}", message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Skill/build record whose character has not been seeded
    pub missing_character: SkipLog,
    /// Character record naming an unknown element or path
    pub unknown_reference: SkipLog,
    /// Delete build substats/sets that the current source no longer lists
    pub prune_stale: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            missing_character: SkipLog::Silent,
            unknown_reference: SkipLog::Warn,
            prune_stale: true,
        }
    }
}

/// Rows processed per stage of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub elements: usize,
    pub paths: usize,
    pub characters: usize,
    pub skills: usize,
    pub builds: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.elements + self.paths + self.characters + self.skills + self.builds
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements, {} paths, {} characters, {} skills, {} builds",
            self.elements, self.paths, self.characters, self.skills, self.builds
        )
    }
}

/// Runs every stage against one storage handle
pub struct Seeder<'a> {
    writer: &'a SqliteWriter,
    options: SeedOptions,
}

impl<'a> Seeder<'a> {
    pub fn new(writer: &'a SqliteWriter, options: SeedOptions) -> Self {
        Self { writer, options }
    }

    /// Run the whole pipeline against the documents in `data_dir`.
    /// Expects the schema to be migrated already.
    pub fn run(&self, data_dir: &Path) -> Result<SeedReport, SeedError> {
        info!("Starting database seeding from {:?}", data_dir);

        let elements = reference::seed_elements(self.writer)?;
        let paths = reference::seed_paths(self.writer)?;

        let records = load_characters(data_dir)?;
        let characters = characters::seed_characters(self.writer, &records, &self.options)?;

        let skill_map = load_skills(data_dir)?;
        let skills = skills::seed_skills(self.writer, &skill_map, &self.options);

        let build_map = load_builds(data_dir)?;
        let builds = builds::seed_builds(self.writer, &build_map, &self.options);

        let report = SeedReport {
            elements,
            paths,
            characters,
            skills,
            builds,
        };
        info!("Database seeding completed: {}", report);

        Ok(report)
    }
}

/// Whether the character row exists. Lookup failures count as missing and are
/// always logged.
pub(crate) fn character_exists(
    writer: &SqliteWriter,
    character_id: &str,
    stage: Stage,
    options: &SeedOptions,
) -> bool {
    match writer.find_id(CHARACTERS.name, &[("id", character_id.into())]) {
        Ok(Some(_)) => true,
        Ok(None) => {
            options
                .missing_character
                .emit(format_args!("{}: no character '{}', skipping", stage, character_id));
            false
        }
        Err(e) => {
            warn!(%stage, character_id, error = %e, "Failed to look up character");
            false
        }
    }
}
