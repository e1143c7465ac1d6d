use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::schema_gen::{generate_create_table, generate_drop_table, generate_indexes};
use crate::error::SeedError;
use crate::parser::SqlValue;
use crate::schema::DependencyResolver;

/// One owned-character row per user and character
pub const USER_CHARACTER_UNIQUE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_character_unique ON user_characters(user_id, character_id)";

/// Storage handle shared by every seeding stage
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) the database at `db_path`. Existing data is kept.
    pub fn open(db_path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(conn)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )?;
        // In-memory databases answer "memory" and stay that way
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "opened database");

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create every table and index that does not exist yet
    pub fn migrate(&self) -> Result<usize, SeedError> {
        let tables = DependencyResolver::new()
            .all_tables_ordered()
            .map_err(SeedError::Dependency)?;

        for schema in &tables {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .map_err(|source| SeedError::Schema {
                    table: schema.name.to_string(),
                    source,
                })?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .map_err(|source| SeedError::Schema {
                        table: schema.name.to_string(),
                        source,
                    })?;
            }
        }

        self.execute_raw(USER_CHARACTER_UNIQUE_INDEX)
            .map_err(|source| SeedError::Schema {
                table: "user_characters".to_string(),
                source,
            })?;

        info!("Migrated {} tables", tables.len());
        Ok(tables.len())
    }

    /// Drop every table, children first
    pub fn drop_all(&self) -> Result<usize, SeedError> {
        let tables = DependencyResolver::new()
            .drop_order()
            .map_err(SeedError::Dependency)?;

        for schema in &tables {
            self.conn
                .execute(&generate_drop_table(schema), [])
                .map_err(|source| SeedError::Schema {
                    table: schema.name.to_string(),
                    source,
                })?;
        }

        info!("Dropped {} tables", tables.len());
        Ok(tables.len())
    }

    /// Run a raw SQL statement (or batch) as-is
    pub fn execute_raw(&self, sql: &str) -> rusqlite::Result<()> {
        self.conn.execute_batch(sql)
    }

    /// Find the row id matching every key column
    pub fn find_id(&self, table: &str, keys: &[(&str, SqlValue)]) -> rusqlite::Result<Option<i64>> {
        let sql = format!("SELECT rowid FROM {} WHERE {}", table, where_clause(keys));
        let mut stmt = self.conn.prepare_cached(&sql)?;

        stmt.query_row(params_from_iter(keys.iter().map(|(_, v)| v)), |row| row.get(0))
            .optional()
    }

    /// Return the row matching `keys`, inserting `keys` + `defaults` if none
    /// exists. An existing row is left untouched. The flag is true when a row
    /// was created.
    pub fn find_or_create(
        &self,
        table: &str,
        keys: &[(&str, SqlValue)],
        defaults: &[(&str, SqlValue)],
    ) -> rusqlite::Result<(i64, bool)> {
        if let Some(id) = self.find_id(table, keys)? {
            return Ok((id, false));
        }

        let columns: Vec<&(&str, SqlValue)> = keys.iter().chain(defaults).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.iter().map(|(c, _)| *c).collect::<Vec<_>>().join(", "),
            placeholders(columns.len())
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(columns.iter().map(|(_, v)| v)))?;
        debug!(table, "created lookup row");

        Ok((self.conn.last_insert_rowid(), true))
    }

    /// Insert a row keyed by `keys`, or overwrite every column in `fields` on
    /// the row that already has those keys. `keys` must match a primary key or
    /// unique index. Returns the row id.
    pub fn upsert(
        &self,
        table: &str,
        keys: &[(&str, SqlValue)],
        fields: &[(&str, SqlValue)],
    ) -> rusqlite::Result<i64> {
        if fields.is_empty() {
            return self.find_or_create(table, keys, &[]).map(|(id, _)| id);
        }

        let key_columns: Vec<&str> = keys.iter().map(|(c, _)| *c).collect();
        let columns: Vec<&(&str, SqlValue)> = keys.iter().chain(fields).collect();
        let assignments: Vec<String> = fields
            .iter()
            .map(|(c, _)| format!("{c} = excluded.{c}"))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {} RETURNING rowid",
            table,
            columns.iter().map(|(c, _)| *c).collect::<Vec<_>>().join(", "),
            placeholders(columns.len()),
            key_columns.join(", "),
            assignments.join(", ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.query_row(params_from_iter(columns.iter().map(|(_, v)| v)), |row| row.get(0))
    }

    /// Delete the children of one parent whose `child_column` value is not in
    /// `keep`. An empty `keep` deletes every child of the parent.
    pub fn delete_missing(
        &self,
        table: &str,
        parent: (&str, SqlValue),
        child_column: &str,
        keep: &[SqlValue],
    ) -> rusqlite::Result<usize> {
        let mut sql = format!("DELETE FROM {} WHERE {} = ?", table, parent.0);
        if !keep.is_empty() {
            sql.push_str(&format!(
                " AND {} NOT IN ({})",
                child_column,
                placeholders(keep.len())
            ));
        }

        let params = std::iter::once(&parent.1).chain(keep.iter());
        self.conn.execute(&sql, params_from_iter(params))
    }

    /// Load the `name -> id` map of a lookup table in one query
    pub fn name_ids(&self, table: &str) -> rusqlite::Result<HashMap<String, i64>> {
        let sql = format!("SELECT name, id FROM {}", table);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        rows.collect()
    }

    pub fn count(&self, table: &str) -> rusqlite::Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        self.conn.query_row(&sql, [], |row| row.get(0))
    }

    /// Finalize the database after a run
    pub fn finalize(self) -> rusqlite::Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")
    }
}

fn where_clause(keys: &[(&str, SqlValue)]) -> String {
    keys.iter()
        .map(|(c, _)| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
