use std::collections::BTreeMap;
use tracing::{info, warn};

use super::{character_exists, SeedOptions};
use crate::error::Stage;
use crate::parser::{Fields, SkillRecord};
use crate::schema::CHARACTER_SKILLS;
use crate::writer::SqliteWriter;

/// Upsert one skill row per existing character. Returns the rows written.
pub fn seed_skills(
    writer: &SqliteWriter,
    skills: &BTreeMap<String, SkillRecord>,
    options: &SeedOptions,
) -> usize {
    let mut count = 0;

    for (character_id, skill) in skills {
        if !character_exists(writer, character_id, Stage::Skills, options) {
            continue;
        }

        let result = writer.upsert(
            CHARACTER_SKILLS.name,
            &[("character_id", character_id.into())],
            &skill_fields(skill),
        );

        match result {
            Ok(_) => count += 1,
            Err(e) => warn!(character_id = %character_id, error = %e, "Failed to seed skill"),
        }
    }

    info!("Seeded {} character skills", count);
    count
}

fn skill_fields(skill: &SkillRecord) -> Fields {
    vec![
        ("basic_multiplier", skill.basic_multiplier.into()),
        ("skill_multiplier", skill.skill_multiplier.into()),
        ("ult_multiplier", skill.ult_multiplier.into()),
        ("basic_energy", skill.basic_energy.into()),
        ("skill_energy", skill.skill_energy.into()),
        ("ult_cost", skill.ult_cost.into()),
        ("ult_type", skill.ult_type.as_str().into()),
        ("passive", skill.passive.as_deref().into()),
        ("base_atk", skill.base_atk.into()),
        ("base_crit_rate", skill.base_crit_rate.into()),
        ("base_crit_dmg", skill.base_crit_dmg.into()),
    ]
}
