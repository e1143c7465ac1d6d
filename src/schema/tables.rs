//! Table schema definitions for the HSR tools relational store

use super::types::*;

// =============================================================================
// Lookup Tables (no FK dependencies)
// =============================================================================

pub static ELEMENTS: TableSchema = TableSchema {
    name: "elements",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("icon_url", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
};

pub static PATHS: TableSchema = TableSchema {
    name: "paths",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("icon_url", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
};

pub static RELIC_SETS: TableSchema = TableSchema {
    name: "relic_sets",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        // "relic" or "planar"; left empty when created lazily by a build
        Column::new("type", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
};

// =============================================================================
// Characters
// =============================================================================

pub static CHARACTERS: TableSchema = TableSchema {
    name: "characters",
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("char_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("element_id", ColumnType::Integer),
        Column::required("path_id", ColumnType::Integer),
        Column::required("rarity", ColumnType::Integer).default_value("4"),
        Column::required("base_speed", ColumnType::Integer).default_value("100"),
        Column::required("release_order", ColumnType::Integer).default_value("0"),
    ],
    foreign_keys: &[
        ForeignKey::new("element_id", "elements"),
        ForeignKey::new("path_id", "paths"),
    ],
    indexes: &[Index::unique(&["char_id"]), Index::on(&["release_order"])],
};

pub static CHARACTER_SKILLS: TableSchema = TableSchema {
    name: "character_skills",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("character_id", ColumnType::Text),
        Column::new("basic_multiplier", ColumnType::Real).default_value("1.0"),
        Column::new("skill_multiplier", ColumnType::Real).default_value("1.0"),
        Column::new("ult_multiplier", ColumnType::Real).default_value("2.0"),
        Column::new("basic_energy", ColumnType::Integer).default_value("20"),
        Column::new("skill_energy", ColumnType::Integer).default_value("30"),
        Column::new("ult_cost", ColumnType::Integer).default_value("120"),
        Column::new("ult_type", ColumnType::Text).default_value("'normal'"),
        Column::new("passive", ColumnType::Text),
        Column::new("base_atk", ColumnType::Integer).default_value("500"),
        Column::new("base_crit_rate", ColumnType::Real).default_value("0.05"),
        Column::new("base_crit_dmg", ColumnType::Real).default_value("0.50"),
    ],
    foreign_keys: &[ForeignKey::new("character_id", "characters")],
    indexes: &[Index::unique(&["character_id"])],
};

pub static CHARACTER_BUILDS: TableSchema = TableSchema {
    name: "character_builds",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("character_id", ColumnType::Text),
        Column::new("body_main", ColumnType::Text),
        Column::new("feet_main", ColumnType::Text),
        Column::new("orb_main", ColumnType::Text),
        Column::new("rope_main", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("character_id", "characters")],
    indexes: &[Index::unique(&["character_id"])],
};

pub static CHARACTER_BUILD_SETS: TableSchema = TableSchema {
    name: "character_build_sets",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("build_id", ColumnType::Integer),
        Column::required("relic_set_id", ColumnType::Integer),
        Column::new("priority", ColumnType::Integer).default_value("1"),
    ],
    foreign_keys: &[
        ForeignKey::new("build_id", "character_builds"),
        ForeignKey::new("relic_set_id", "relic_sets"),
    ],
    indexes: &[Index::unique(&["build_id", "relic_set_id"])],
};

pub static CHARACTER_BUILD_SUBSTATS: TableSchema = TableSchema {
    name: "character_build_substats",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("build_id", ColumnType::Integer),
        Column::required("stat_name", ColumnType::Text),
        Column::new("weight", ColumnType::Real).default_value("0.5"),
    ],
    foreign_keys: &[ForeignKey::new("build_id", "character_builds")],
    indexes: &[Index::unique(&["build_id", "stat_name"])],
};

// =============================================================================
// Users
// =============================================================================

pub static USERS: TableSchema = TableSchema {
    name: "users",
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("email", ColumnType::Text),
        Column::new("password_hash", ColumnType::Text),
        Column::new("name", ColumnType::Text),
        Column::new("uid", ColumnType::Text),
        Column::new("nickname", ColumnType::Text),
        Column::new("email_verified", ColumnType::Boolean).default_value("0"),
        Column::new("created_at", ColumnType::Timestamp),
        Column::new("updated_at", ColumnType::Timestamp),
        Column::new("deleted_at", ColumnType::Timestamp),
    ],
    foreign_keys: &[],
    indexes: &[
        Index::unique(&["email"]),
        Index::unique(&["uid"]),
        Index::on(&["deleted_at"]),
    ],
};

/// Owned-character join rows. Uniqueness on (user_id, character_id) is
/// created by migration as `idx_user_character_unique`.
pub static USER_CHARACTERS: TableSchema = TableSchema {
    name: "user_characters",
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("user_id", ColumnType::Text),
        Column::required("character_id", ColumnType::Text),
        Column::new("eidolon", ColumnType::Integer).default_value("0"),
        Column::new("level", ColumnType::Integer).default_value("1"),
        Column::new("created_at", ColumnType::Timestamp),
    ],
    foreign_keys: &[
        ForeignKey::new("user_id", "users"),
        ForeignKey::new("character_id", "characters"),
    ],
    indexes: &[],
};

// =============================================================================
// Game Data
// =============================================================================

pub static BANNERS: TableSchema = TableSchema {
    name: "banners",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        // "character", "weapon", "standard"
        Column::new("type", ColumnType::Text),
        Column::required("start_date", ColumnType::Timestamp),
        Column::required("end_date", ColumnType::Timestamp),
        Column::new("image_url", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["start_date"]), Index::on(&["end_date"])],
};

pub static BANNER_CHARACTERS: TableSchema = TableSchema {
    name: "banner_characters",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("banner_id", ColumnType::Integer),
        Column::required("character_id", ColumnType::Text),
        Column::new("is_featured", ColumnType::Boolean).default_value("0"),
    ],
    foreign_keys: &[
        ForeignKey::new("banner_id", "banners"),
        ForeignKey::new("character_id", "characters"),
    ],
    indexes: &[],
};

pub static CODES: TableSchema = TableSchema {
    name: "codes",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("code", ColumnType::Text),
        Column::new("rewards", ColumnType::Text),
        Column::new("is_active", ColumnType::Boolean).default_value("1"),
        Column::new("expires_at", ColumnType::Timestamp),
        Column::new("created_at", ColumnType::Timestamp),
    ],
    foreign_keys: &[],
    indexes: &[
        Index::unique(&["code"]),
        Index::on(&["is_active"]),
        Index::on(&["expires_at"]),
    ],
};

pub static EVENTS: TableSchema = TableSchema {
    name: "events",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::required("start_date", ColumnType::Timestamp),
        Column::required("end_date", ColumnType::Timestamp),
        Column::new("image_url", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["start_date"]), Index::on(&["end_date"])],
};

// =============================================================================
// Registry
// =============================================================================

pub static ALL_TABLES: &[&TableSchema] = &[
    &ELEMENTS,
    &PATHS,
    &RELIC_SETS,
    &CHARACTERS,
    &CHARACTER_SKILLS,
    &CHARACTER_BUILDS,
    &CHARACTER_BUILD_SETS,
    &CHARACTER_BUILD_SUBSTATS,
    &USERS,
    &USER_CHARACTERS,
    &BANNERS,
    &BANNER_CHARACTERS,
    &CODES,
    &EVENTS,
];

/// Look up a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
