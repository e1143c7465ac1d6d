//! Source documents bundled with the frontend data directory
//!
//! Three fixed shapes are read:
//! - `characters.json`: an array of character records
//! - `skills.json`: an object keyed by character id
//! - `optimal-builds.json`: an object keyed by character id
//!
//! Keyed documents decode into `BTreeMap`s so a run always visits characters
//! in the same order.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{SeedError, Stage};

pub const CHARACTERS_FILE: &str = "characters.json";
pub const SKILLS_FILE: &str = "skills.json";
pub const BUILDS_FILE: &str = "optimal-builds.json";

/// One playable character as listed in `characters.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: String,
    #[serde(default)]
    pub char_id: String,
    #[serde(default)]
    pub name: String,
    /// Human-readable path name, e.g. "The Hunt". Absent decodes to "",
    /// which never resolves and skips only this record.
    #[serde(default)]
    pub path: String,
    /// Human-readable element name, e.g. "Lightning"
    #[serde(default)]
    pub element: String,
    #[serde(default = "defaults::rarity")]
    pub rarity: i64,
    #[serde(default = "defaults::base_speed")]
    pub base_speed: i64,
    #[serde(default)]
    pub release_order: i64,
}

/// Skill multipliers and base stats, keyed by character id in `skills.json`.
/// Missing fields take the same values as the storage column defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    #[serde(default = "defaults::basic_multiplier")]
    pub basic_multiplier: f64,
    #[serde(default = "defaults::skill_multiplier")]
    pub skill_multiplier: f64,
    #[serde(default = "defaults::ult_multiplier")]
    pub ult_multiplier: f64,
    #[serde(default = "defaults::basic_energy")]
    pub basic_energy: i64,
    #[serde(default = "defaults::skill_energy")]
    pub skill_energy: i64,
    #[serde(default = "defaults::ult_cost")]
    pub ult_cost: i64,
    #[serde(default = "defaults::ult_type", deserialize_with = "defaults::ult_type_or_null")]
    pub ult_type: String,
    #[serde(default)]
    pub passive: Option<String>,
    #[serde(default = "defaults::base_atk")]
    pub base_atk: i64,
    #[serde(default = "defaults::base_crit_rate")]
    pub base_crit_rate: f64,
    #[serde(default = "defaults::base_crit_dmg")]
    pub base_crit_dmg: f64,
}

/// Recommended main stat per relic slot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainStats {
    pub body: Option<String>,
    pub feet: Option<String>,
    pub orb: Option<String>,
    pub rope: Option<String>,
}

/// Recommended gear, keyed by character id in `optimal-builds.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Display name of the character; not stored
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub substats: BTreeMap<String, f64>,
    #[serde(default)]
    pub main_stats: MainStats,
    /// Relic/planar set names, best first
    #[serde(default)]
    pub sets: Vec<String>,
}

mod defaults {
    use serde::{Deserialize, Deserializer};

    pub fn rarity() -> i64 {
        4
    }
    pub fn base_speed() -> i64 {
        100
    }
    pub fn basic_multiplier() -> f64 {
        1.0
    }
    pub fn skill_multiplier() -> f64 {
        1.0
    }
    pub fn ult_multiplier() -> f64 {
        2.0
    }
    pub fn basic_energy() -> i64 {
        20
    }
    pub fn skill_energy() -> i64 {
        30
    }
    pub fn ult_cost() -> i64 {
        120
    }
    pub fn ult_type() -> String {
        "normal".to_string()
    }
    /// `null` behaves like an absent key
    pub fn ult_type_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(ult_type))
    }
    pub fn base_atk() -> i64 {
        500
    }
    pub fn base_crit_rate() -> f64 {
        0.05
    }
    pub fn base_crit_dmg() -> f64 {
        0.50
    }
}

/// Read and decode one JSON document. Both failures abort the run.
pub fn load_json<T: DeserializeOwned>(path: &Path, stage: Stage) -> Result<T, SeedError> {
    let bytes = std::fs::read(path).map_err(|source| SeedError::Read {
        stage,
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_characters(data_dir: &Path) -> Result<Vec<CharacterRecord>, SeedError> {
    load_json(&data_dir.join(CHARACTERS_FILE), Stage::Characters)
}

pub fn load_skills(data_dir: &Path) -> Result<BTreeMap<String, SkillRecord>, SeedError> {
    load_json(&data_dir.join(SKILLS_FILE), Stage::Skills)
}

pub fn load_builds(data_dir: &Path) -> Result<BTreeMap<String, BuildRecord>, SeedError> {
    load_json(&data_dir.join(BUILDS_FILE), Stage::Builds)
}
