use tracing::{info, warn};

use super::SeedOptions;
use crate::error::{SeedError, Stage};
use crate::parser::{CharacterRecord, Fields};
use crate::schema::{CHARACTERS, ELEMENTS, PATHS};
use crate::writer::SqliteWriter;

/// Upsert every character whose element and path resolve. Records with an
/// unknown name, or whose write fails, are skipped. Returns the rows written.
pub fn seed_characters(
    writer: &SqliteWriter,
    records: &[CharacterRecord],
    options: &SeedOptions,
) -> Result<usize, SeedError> {
    let element_ids = writer
        .name_ids(ELEMENTS.name)
        .map_err(|source| SeedError::Lookup {
            stage: Stage::Characters,
            table: ELEMENTS.name,
            source,
        })?;
    let path_ids = writer
        .name_ids(PATHS.name)
        .map_err(|source| SeedError::Lookup {
            stage: Stage::Characters,
            table: PATHS.name,
            source,
        })?;

    let mut count = 0;

    for record in records {
        let Some(&element_id) = element_ids.get(&record.element) else {
            options.unknown_reference.emit(format_args!(
                "Unknown element '{}' for character '{}'",
                record.element, record.name
            ));
            continue;
        };

        let Some(&path_id) = path_ids.get(&record.path) else {
            options.unknown_reference.emit(format_args!(
                "Unknown path '{}' for character '{}'",
                record.path, record.name
            ));
            continue;
        };

        let result = writer.upsert(
            CHARACTERS.name,
            &[("id", record.id.as_str().into())],
            &character_fields(record, element_id, path_id),
        );

        match result {
            Ok(_) => count += 1,
            Err(e) => warn!(character = %record.name, error = %e, "Failed to seed character"),
        }
    }

    info!("Seeded {} characters", count);
    Ok(count)
}

/// Every non-key column; an existing row is fully replaced
fn character_fields(record: &CharacterRecord, element_id: i64, path_id: i64) -> Fields {
    vec![
        ("char_id", record.char_id.as_str().into()),
        ("name", record.name.as_str().into()),
        ("element_id", element_id.into()),
        ("path_id", path_id.into()),
        ("rarity", record.rarity.into()),
        ("base_speed", record.base_speed.into()),
        ("release_order", record.release_order.into()),
    ]
}
