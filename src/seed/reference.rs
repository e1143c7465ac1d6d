//! Fixed element and path lookup rows

use tracing::info;

use crate::error::{SeedError, Stage};
use crate::schema::{TableSchema, ELEMENTS, PATHS};
use crate::writer::SqliteWriter;

/// A compiled-in lookup row: unique name plus icon URL
#[derive(Debug, Clone, Copy)]
pub struct LookupRow {
    pub name: &'static str,
    pub icon_url: &'static str,
}

const fn row(name: &'static str, icon_url: &'static str) -> LookupRow {
    LookupRow { name, icon_url }
}

pub const ELEMENT_ROWS: &[LookupRow] = &[
    row("Physical", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Physical.png"),
    row("Fire", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Fire.png"),
    row("Ice", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Ice.png"),
    row("Lightning", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Thunder.png"),
    row("Wind", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Wind.png"),
    row("Quantum", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Quantum.png"),
    row("Imaginary", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/element/Imaginary.png"),
];

pub const PATH_ROWS: &[LookupRow] = &[
    row("Destruction", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Destruction.png"),
    row("The Hunt", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Hunt.png"),
    row("Erudition", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Erudition.png"),
    row("Harmony", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Harmony.png"),
    row("Nihility", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Nihility.png"),
    row("Preservation", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Preservation.png"),
    row("Abundance", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Abundance.png"),
    row("Remembrance", "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/path/Remembrance.png"),
];

pub fn seed_elements(writer: &SqliteWriter) -> Result<usize, SeedError> {
    seed_lookup(writer, &ELEMENTS, Stage::Elements, ELEMENT_ROWS)
}

pub fn seed_paths(writer: &SqliteWriter) -> Result<usize, SeedError> {
    seed_lookup(writer, &PATHS, Stage::Paths, PATH_ROWS)
}

/// Create each row that is missing by name. Existing rows keep their icon.
/// Any write failure aborts: every later stage needs complete lookups.
fn seed_lookup(
    writer: &SqliteWriter,
    table: &TableSchema,
    stage: Stage,
    rows: &[LookupRow],
) -> Result<usize, SeedError> {
    let mut created = 0;

    for lookup in rows {
        let (_, is_new) = writer
            .find_or_create(
                table.name,
                &[("name", lookup.name.into())],
                &[("icon_url", lookup.icon_url.into())],
            )
            .map_err(|source| SeedError::Reference {
                stage,
                name: lookup.name.to_string(),
                source,
            })?;

        if is_new {
            created += 1;
        }
    }

    info!("Seeded {} {} ({} new)", rows.len(), stage, created);
    Ok(rows.len())
}
