//! End-to-end tests that run the full seeding pipeline against JSON fixtures
//! written to a temporary data directory.

use rusqlite::types::Value;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tracing_subscriber::fmt::MakeWriter;

use hsr_seed::parser::{BUILDS_FILE, CHARACTERS_FILE, SKILLS_FILE};
use hsr_seed::schema::tables::ALL_TABLES;
use hsr_seed::{SeedError, SeedOptions, SeedReport, Seeder, SkipLog, SqliteWriter, Stage};

// =============================================================================
// Fixtures
// =============================================================================

fn characters() -> serde_json::Value {
    json!([
        {"id": "1102", "charId": "SW", "name": "Seele", "path": "The Hunt",
         "element": "Quantum", "rarity": 5, "baseSpeed": 115, "releaseOrder": 3},
        {"id": "1001", "charId": "MP", "name": "March 7th", "path": "Preservation",
         "element": "Ice", "rarity": 4, "baseSpeed": 101, "releaseOrder": 0},
        {"id": "1999", "charId": "XX", "name": "Nobody", "path": "Elation",
         "element": "Fire", "rarity": 4, "baseSpeed": 100, "releaseOrder": 9}
    ])
}

fn skills() -> serde_json::Value {
    json!({
        "1102": {"basicMultiplier": 1.0, "skillMultiplier": 2.2, "ultMultiplier": 4.25,
                 "basicEnergy": 20, "skillEnergy": 30, "ultCost": 120, "ultType": "single",
                 "passive": "Resurgence", "baseAtk": 640, "baseCritRate": 0.05, "baseCritDmg": 0.5},
        "1001": {"ultCost": 120, "ultType": "aoe", "passive": "Counter"}
    })
}

fn builds() -> serde_json::Value {
    json!({
        "1102": {"name": "Seele",
                 "substats": {"CRIT Rate": 1.0, "CRIT DMG": 1.0, "ATK%": 0.75, "SPD": 0.5},
                 "mainStats": {"body": "CRIT Rate", "feet": "ATK%", "orb": "Quantum DMG", "rope": "ATK%"},
                 "sets": ["Genius of Brilliant Stars", "Rutilant Arena", "Izumo Gensei"]},
        "1001": {"name": "March 7th",
                 "substats": {"DEF%": 1.0, "Effect RES": 0.5},
                 "mainStats": {"body": "DEF%", "feet": "SPD", "orb": "DEF%", "rope": "Energy Regen Rate"},
                 "sets": ["Knight of Purity Palace", "Fleet of the Ageless"]}
    })
}

fn write_data(
    dir: &Path,
    characters: &serde_json::Value,
    skills: &serde_json::Value,
    builds: &serde_json::Value,
) {
    fs::write(dir.join(CHARACTERS_FILE), characters.to_string()).unwrap();
    fs::write(dir.join(SKILLS_FILE), skills.to_string()).unwrap();
    fs::write(dir.join(BUILDS_FILE), builds.to_string()).unwrap();
}

fn default_data() -> TempDir {
    let dir = tempdir().unwrap();
    write_data(dir.path(), &characters(), &skills(), &builds());
    dir
}

fn migrated() -> SqliteWriter {
    let writer = SqliteWriter::open_in_memory().unwrap();
    writer.migrate().unwrap();
    writer
}

fn run(writer: &SqliteWriter, data_dir: &Path) -> Result<SeedReport, SeedError> {
    Seeder::new(writer, SeedOptions::default()).run(data_dir)
}

// =============================================================================
// Inspection Utilities
// =============================================================================

/// Every row of every table, in rowid order
fn snapshot(writer: &SqliteWriter) -> Vec<(&'static str, Vec<Vec<Value>>)> {
    ALL_TABLES
        .iter()
        .map(|table| {
            let sql = format!("SELECT * FROM {} ORDER BY rowid", table.name);
            let mut stmt = writer.connection().prepare(&sql).unwrap();
            let columns = stmt.column_count();
            let rows = stmt
                .query_map([], |row| -> rusqlite::Result<Vec<Value>> {
                    (0..columns).map(|i| row.get::<_, Value>(i)).collect()
                })
                .unwrap()
                .collect::<Result<Vec<Vec<Value>>, _>>()
                .unwrap();
            (table.name, rows)
        })
        .collect()
}

/// Log output collected by a test-scoped subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run the pipeline with a subscriber that records WARN and above
fn run_logged(
    writer: &SqliteWriter,
    data_dir: &Path,
    options: SeedOptions,
) -> (Result<SeedReport, SeedError>, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        Seeder::new(writer, options).run(data_dir)
    });
    (result, logs.contents())
}

fn scalar(writer: &SqliteWriter, sql: &str) -> i64 {
    writer.connection().query_row(sql, [], |row| row.get(0)).unwrap()
}

fn set_names_by_priority(writer: &SqliteWriter, character_id: &str) -> Vec<(String, i64)> {
    let mut stmt = writer
        .connection()
        .prepare(
            "SELECT r.name, s.priority FROM character_build_sets s
             JOIN character_builds b ON b.id = s.build_id
             JOIN relic_sets r ON r.id = s.relic_set_id
             WHERE b.character_id = ?1 ORDER BY s.priority, r.name",
        )
        .unwrap();
    let rows = stmt
        .query_map([character_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    rows
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_end_to_end_scenario() {
    let data = default_data();
    let writer = migrated();

    let report = run(&writer, data.path()).unwrap();

    assert_eq!(
        report,
        SeedReport {
            elements: 7,
            paths: 8,
            characters: 2,
            skills: 2,
            builds: 2,
        }
    );
    assert_eq!(writer.count("elements").unwrap(), 7);
    assert_eq!(writer.count("paths").unwrap(), 8);
    assert_eq!(writer.count("characters").unwrap(), 2);
    assert_eq!(writer.count("character_skills").unwrap(), 2);
    assert_eq!(writer.count("character_builds").unwrap(), 2);
    assert_eq!(writer.count("character_build_substats").unwrap(), 6);
    assert_eq!(writer.count("character_build_sets").unwrap(), 5);
    assert_eq!(writer.count("relic_sets").unwrap(), 5);
    assert!(writer.find_id("characters", &[("id", "1999".into())]).unwrap().is_none());
}

#[test]
fn test_unknown_path_skip_is_logged() {
    let data = default_data();
    let writer = migrated();

    let (result, logs) = run_logged(&writer, data.path(), SeedOptions::default());

    assert_eq!(result.unwrap().characters, 2);
    assert!(logs.contains("Unknown path 'Elation' for character 'Nobody'"), "{}", logs);
}

#[test]
fn test_skip_levels_are_configurable() {
    let data = tempdir().unwrap();
    let mut skill_map = skills();
    skill_map["8001"] = json!({"ultCost": 100});
    write_data(data.path(), &characters(), &skill_map, &builds());
    let options = SeedOptions {
        missing_character: SkipLog::Warn,
        unknown_reference: SkipLog::Silent,
        ..SeedOptions::default()
    };

    let writer = migrated();
    let (result, logs) = run_logged(&writer, data.path(), options);

    assert_eq!(result.unwrap().skills, 2);
    assert!(logs.contains("skills: no character '8001', skipping"), "{}", logs);
    assert!(!logs.contains("Unknown path"), "{}", logs);
}

#[test]
fn test_record_without_element_is_skipped() {
    let data = tempdir().unwrap();
    let mut records = characters();
    records[1].as_object_mut().unwrap().remove("element");
    write_data(data.path(), &records, &skills(), &builds());

    let writer = migrated();
    let (result, logs) = run_logged(&writer, data.path(), SeedOptions::default());
    let report = result.unwrap();

    assert_eq!(report.characters, 1);
    assert_eq!(report.skills, 1);
    assert!(writer.find_id("characters", &[("id", "1102".into())]).unwrap().is_some());
    assert!(writer.find_id("characters", &[("id", "1001".into())]).unwrap().is_none());
    assert!(logs.contains("Unknown element '' for character 'March 7th'"), "{}", logs);
}

#[test]
fn test_null_ult_type_falls_back_to_default() {
    let data = tempdir().unwrap();
    let mut skill_map = skills();
    skill_map["1102"]["ultType"] = json!(null);
    write_data(data.path(), &characters(), &skill_map, &builds());

    let writer = migrated();
    run(&writer, data.path()).unwrap();

    let ult_type: String = writer
        .connection()
        .query_row(
            "SELECT ult_type FROM character_skills WHERE character_id = '1102'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(ult_type, "normal");
}

#[test]
fn test_rerun_is_idempotent() {
    let data = default_data();
    let writer = migrated();

    let first_report = run(&writer, data.path()).unwrap();
    let first = snapshot(&writer);
    let second_report = run(&writer, data.path()).unwrap();
    let second = snapshot(&writer);

    assert_eq!(first_report, second_report);
    assert_eq!(first, second);
}

#[test]
fn test_referential_integrity() {
    let data = default_data();
    let writer = migrated();
    run(&writer, data.path()).unwrap();

    let dangling_lookups = scalar(
        &writer,
        "SELECT COUNT(*) FROM characters c
         LEFT JOIN elements e ON e.id = c.element_id
         LEFT JOIN paths p ON p.id = c.path_id
         WHERE e.id IS NULL OR p.id IS NULL",
    );
    let orphan_skills = scalar(
        &writer,
        "SELECT COUNT(*) FROM character_skills s
         LEFT JOIN characters c ON c.id = s.character_id WHERE c.id IS NULL",
    );
    let orphan_builds = scalar(
        &writer,
        "SELECT COUNT(*) FROM character_builds b
         LEFT JOIN characters c ON c.id = b.character_id WHERE c.id IS NULL",
    );

    assert_eq!(dangling_lookups, 0);
    assert_eq!(orphan_skills, 0);
    assert_eq!(orphan_builds, 0);
}

#[test]
fn test_reseed_replaces_character_fields() {
    let data = default_data();
    let writer = migrated();
    run(&writer, data.path()).unwrap();

    let mut changed = characters();
    changed[1]["rarity"] = json!(5);
    changed[1]["element"] = json!("Imaginary");
    write_data(data.path(), &changed, &skills(), &builds());
    run(&writer, data.path()).unwrap();

    assert_eq!(scalar(&writer, "SELECT COUNT(*) FROM characters WHERE id = '1001'"), 1);
    assert_eq!(scalar(&writer, "SELECT rarity FROM characters WHERE id = '1001'"), 5);
    let element: String = writer
        .connection()
        .query_row(
            "SELECT e.name FROM characters c JOIN elements e ON e.id = c.element_id WHERE c.id = '1001'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(element, "Imaginary");
}

#[test]
fn test_orphan_skill_and_build_records_are_dropped() {
    let data = tempdir().unwrap();
    let mut skill_map = skills();
    skill_map["8001"] = json!({"ultCost": 100});
    let mut build_map = builds();
    build_map["8001"] = json!({"sets": ["Unreleased Set"], "substats": {"SPD": 1.0}});
    write_data(data.path(), &characters(), &skill_map, &build_map);

    let writer = migrated();
    let report = run(&writer, data.path()).unwrap();

    assert_eq!(report.skills, 2);
    assert_eq!(report.builds, 2);
    assert_eq!(scalar(&writer, "SELECT COUNT(*) FROM character_skills WHERE character_id = '8001'"), 0);
    assert_eq!(scalar(&writer, "SELECT COUNT(*) FROM relic_sets WHERE name = 'Unreleased Set'"), 0);
}

#[test]
fn test_build_set_priorities_follow_source_order() {
    let data = default_data();
    let writer = migrated();
    run(&writer, data.path()).unwrap();

    assert_eq!(
        set_names_by_priority(&writer, "1102"),
        vec![
            ("Genius of Brilliant Stars".to_string(), 1),
            ("Rutilant Arena".to_string(), 2),
            ("Izumo Gensei".to_string(), 3),
        ]
    );

    let mut build_map = builds();
    build_map["1102"]["sets"] = json!(["Izumo Gensei", "Genius of Brilliant Stars"]);
    write_data(data.path(), &characters(), &skills(), &build_map);
    run(&writer, data.path()).unwrap();

    assert_eq!(
        set_names_by_priority(&writer, "1102"),
        vec![
            ("Izumo Gensei".to_string(), 1),
            ("Genius of Brilliant Stars".to_string(), 2),
        ]
    );
}

#[test]
fn test_relic_sets_are_shared_between_builds() {
    let data = tempdir().unwrap();
    let mut build_map = builds();
    build_map["1001"]["sets"] = json!(["Rutilant Arena"]);
    write_data(data.path(), &characters(), &skills(), &build_map);

    let writer = migrated();
    run(&writer, data.path()).unwrap();

    assert_eq!(scalar(&writer, "SELECT COUNT(*) FROM relic_sets WHERE name = 'Rutilant Arena'"), 1);
    assert_eq!(scalar(&writer, "SELECT COUNT(*) FROM relic_sets WHERE type IS NOT NULL"), 0);
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn test_missing_character_file_aborts() {
    let data = tempdir().unwrap();
    let writer = migrated();

    let err = run(&writer, data.path()).unwrap_err();

    assert!(matches!(err, SeedError::Read { stage: Stage::Characters, .. }));
    // Lookup stages ran before the abort
    assert_eq!(writer.count("elements").unwrap(), 7);
    assert_eq!(writer.count("characters").unwrap(), 0);
}

#[test]
fn test_missing_skills_file_aborts_after_characters() {
    let data = default_data();
    fs::remove_file(data.path().join(SKILLS_FILE)).unwrap();
    let writer = migrated();

    let err = run(&writer, data.path()).unwrap_err();

    assert_eq!(err.stage(), Stage::Skills);
    assert_eq!(writer.count("characters").unwrap(), 2);
    assert_eq!(writer.count("character_builds").unwrap(), 0);
}

#[test]
fn test_malformed_builds_file_aborts() {
    let data = default_data();
    fs::write(data.path().join(BUILDS_FILE), "{\"1102\": {\"sets\": [1, 2]}}").unwrap();
    let writer = migrated();

    let err = run(&writer, data.path()).unwrap_err();

    assert!(matches!(err, SeedError::Parse { stage: Stage::Builds, .. }));
    assert_eq!(writer.count("character_skills").unwrap(), 2);
}

// =============================================================================
// Persistent Store
// =============================================================================

#[test]
fn test_reopened_database_keeps_rows() {
    let data = default_data();
    let db = NamedTempFile::new().unwrap();

    {
        let writer = SqliteWriter::open(db.path()).unwrap();
        writer.migrate().unwrap();
        run(&writer, data.path()).unwrap();
        writer.finalize().unwrap();
    }

    let writer = SqliteWriter::open(db.path()).unwrap();
    writer.migrate().unwrap();
    let before = snapshot(&writer);
    run(&writer, data.path()).unwrap();

    assert_eq!(writer.count("characters").unwrap(), 2);
    assert_eq!(before, snapshot(&writer));
}

#[test]
fn test_fresh_rebuild_starts_empty() {
    let data = default_data();
    let writer = migrated();
    run(&writer, data.path()).unwrap();

    writer.drop_all().unwrap();
    writer.migrate().unwrap();
    assert_eq!(writer.count("characters").unwrap(), 0);

    let report = run(&writer, data.path()).unwrap();
    assert_eq!(report.characters, 2);
}
