use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{character_exists, SeedOptions};
use crate::error::Stage;
use crate::parser::{BuildRecord, Fields, SqlValue};
use crate::schema::{CHARACTER_BUILDS, CHARACTER_BUILD_SETS, CHARACTER_BUILD_SUBSTATS, RELIC_SETS};
use crate::writer::SqliteWriter;

/// Upsert the build of every existing character, then its substat weights and
/// ranked relic sets. Child rows are written one by one with no enclosing
/// transaction; a failed child is logged and the rest still run.
///
/// Returns the number of characters whose build row was written.
pub fn seed_builds(
    writer: &SqliteWriter,
    builds: &BTreeMap<String, BuildRecord>,
    options: &SeedOptions,
) -> usize {
    let mut count = 0;

    for (character_id, build) in builds {
        if !character_exists(writer, character_id, Stage::Builds, options) {
            continue;
        }

        let result = writer.upsert(
            CHARACTER_BUILDS.name,
            &[("character_id", character_id.into())],
            &main_stat_fields(build),
        );

        let build_id = match result {
            Ok(id) => id,
            Err(e) => {
                warn!(character_id = %character_id, error = %e, "Failed to seed build");
                continue;
            }
        };

        seed_substats(writer, build_id, &build.substats, options.prune_stale);
        seed_sets(writer, build_id, &build.sets, options.prune_stale);
        count += 1;
    }

    info!("Seeded {} character builds", count);
    count
}

fn main_stat_fields(build: &BuildRecord) -> Fields {
    let stats = &build.main_stats;
    vec![
        ("body_main", stats.body.as_deref().into()),
        ("feet_main", stats.feet.as_deref().into()),
        ("orb_main", stats.orb.as_deref().into()),
        ("rope_main", stats.rope.as_deref().into()),
    ]
}

fn seed_substats(
    writer: &SqliteWriter,
    build_id: i64,
    substats: &BTreeMap<String, f64>,
    prune_stale: bool,
) {
    for (stat_name, weight) in substats {
        let result = writer.upsert(
            CHARACTER_BUILD_SUBSTATS.name,
            &[("build_id", build_id.into()), ("stat_name", stat_name.into())],
            &[("weight", (*weight).into())],
        );

        if let Err(e) = result {
            warn!(build_id, stat = %stat_name, error = %e, "Failed to seed substat");
        }
    }

    if prune_stale {
        let keep: Vec<SqlValue> = substats.keys().map(SqlValue::from).collect();
        prune(writer, CHARACTER_BUILD_SUBSTATS.name, build_id, "stat_name", &keep);
    }
}

/// Priority is the 1-based position of the set in the source list
fn seed_sets(writer: &SqliteWriter, build_id: i64, sets: &[String], prune_stale: bool) {
    let mut keep = Vec::with_capacity(sets.len());
    let mut resolved_all = true;

    for (position, set_name) in sets.iter().enumerate() {
        // Created lazily, without a relic/planar type
        let relic_set_id = match writer.find_or_create(RELIC_SETS.name, &[("name", set_name.into())], &[]) {
            Ok((id, _)) => id,
            Err(e) => {
                warn!(build_id, set = %set_name, error = %e, "Failed to resolve relic set");
                resolved_all = false;
                continue;
            }
        };
        keep.push(SqlValue::from(relic_set_id));

        let result = writer.upsert(
            CHARACTER_BUILD_SETS.name,
            &[("build_id", build_id.into()), ("relic_set_id", relic_set_id.into())],
            &[("priority", (position + 1).into())],
        );

        if let Err(e) = result {
            warn!(build_id, set = %set_name, error = %e, "Failed to seed build set");
        }
    }

    // An unresolved name would look stale and lose its existing row
    if prune_stale && resolved_all {
        prune(writer, CHARACTER_BUILD_SETS.name, build_id, "relic_set_id", &keep);
    }
}

fn prune(writer: &SqliteWriter, table: &str, build_id: i64, child_column: &str, keep: &[SqlValue]) {
    match writer.delete_missing(table, ("build_id", build_id.into()), child_column, keep) {
        Ok(0) => {}
        Ok(removed) => debug!(build_id, table, removed, "Removed stale build rows"),
        Err(e) => warn!(build_id, table, error = %e, "Failed to remove stale build rows"),
    }
}
