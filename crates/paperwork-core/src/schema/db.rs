use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;

use crate::audit::AuditEntry;
use crate::error::{Error, Result};
use crate::model::{
    Composition, CompositionId, Profile, ProfileId, Share, Writer, WriterId, WriterRole,
};

use super::migrations::MIGRATIONS;

/// A composition together with its writer credits, ready for export.
///
/// Each writer's `display_name` and `registrant_code` have already been
/// resolved from the linked profile when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSource {
    pub composition: Composition,
    pub writers: Vec<Writer>,
}

/// A database connection with CRUD methods for catalog entities.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Composition CRUD
impl Database {
    /// Insert a new composition.
    pub fn insert_composition(&self, composition: &Composition) -> Result<()> {
        insert_composition_on(&self.conn, composition)
    }

    /// Insert a composition and credit `writer` on it, atomically.
    pub fn insert_composition_with_writer(
        &self,
        composition: &Composition,
        writer: &Writer,
    ) -> Result<()> {
        if writer.composition_id != composition.id {
            return Err(Error::InvalidData(format!(
                "writer {} belongs to composition {}, not {}",
                writer.id, writer.composition_id, composition.id
            )));
        }
        let tx = self.conn.unchecked_transaction()?;
        insert_composition_on(&tx, composition)?;
        insert_writer_on(&tx, writer)?;
        tx.commit()?;
        Ok(())
    }

    /// Fetch a composition by id.
    pub fn get_composition(&self, id: &CompositionId) -> Result<Option<Composition>> {
        let composition = self
            .conn
            .query_row(
                "SELECT id, title, work_code, created_at, updated_at
                 FROM compositions WHERE id = ?1",
                [id.to_string()],
                row_to_composition,
            )
            .optional()?;
        Ok(composition)
    }

    /// Find the composition registered under a normalized work code.
    pub fn find_composition_by_work_code(&self, work_code: &str) -> Result<Option<Composition>> {
        let composition = self
            .conn
            .query_row(
                "SELECT id, title, work_code, created_at, updated_at
                 FROM compositions WHERE work_code = ?1
                 ORDER BY created_at LIMIT 1",
                [work_code],
                row_to_composition,
            )
            .optional()?;
        Ok(composition)
    }

    /// Find the oldest composition with exactly this title.
    ///
    /// With `credited`, only compositions crediting that profile match.
    pub fn find_composition_by_title(
        &self,
        title: &str,
        credited: Option<&ProfileId>,
    ) -> Result<Option<Composition>> {
        let composition = self
            .conn
            .query_row(
                "SELECT id, title, work_code, created_at, updated_at
                 FROM compositions c
                 WHERE c.title = ?1
                   AND (?2 IS NULL OR EXISTS (
                        SELECT 1 FROM writers w
                        WHERE w.composition_id = c.id AND w.profile_id = ?2))
                 ORDER BY created_at LIMIT 1",
                rusqlite::params![title, credited.map(ToString::to_string)],
                row_to_composition,
            )
            .optional()?;
        Ok(composition)
    }

    /// List all compositions, oldest first.
    pub fn list_compositions(&self) -> Result<Vec<Composition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, work_code, created_at, updated_at
             FROM compositions
             ORDER BY created_at, title",
        )?;
        let compositions = stmt
            .query_map([], row_to_composition)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(compositions)
    }

    /// Update a composition's title and work code.
    pub fn update_composition(&self, composition: &Composition) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE compositions SET title = ?2, work_code = ?3, updated_at = ?4
             WHERE id = ?1",
            rusqlite::params![
                composition.id.to_string(),
                composition.title,
                composition.work_code,
                composition.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(not_found("composition", composition.id));
        }
        Ok(())
    }

    /// Delete a composition and its writer credits.
    pub fn delete_composition(&self, id: &CompositionId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM compositions WHERE id = ?1", [id.to_string()])?;
        if changed == 0 {
            return Err(not_found("composition", id));
        }
        Ok(())
    }
}

// Profile CRUD
impl Database {
    /// Insert a new writer profile.
    pub fn insert_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (id, name, registrant_code, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                profile.id.to_string(),
                profile.name,
                profile.registrant_code,
                profile.created_at.to_rfc3339(),
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch a profile by id.
    pub fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT id, name, registrant_code, created_at, updated_at
                 FROM profiles WHERE id = ?1",
                [id.to_string()],
                |row| {
                    Ok(Profile {
                        id: parse_column(row, 0)?,
                        name: row.get(1)?,
                        registrant_code: row.get(2)?,
                        created_at: timestamp_column(row, 3)?,
                        updated_at: timestamp_column(row, 4)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }
}

// Writer CRUD
impl Database {
    /// Credit a writer on a composition, after any existing credits.
    pub fn insert_writer(&self, writer: &Writer) -> Result<()> {
        insert_writer_on(&self.conn, writer)
    }

    /// List the writer credits stored on a composition, in credit order.
    ///
    /// Returns the values stored on the credit itself; see
    /// [`Database::load_export_source`] for profile-resolved values.
    pub fn list_writers_for_composition(&self, id: &CompositionId) -> Result<Vec<Writer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, composition_id, profile_id, display_name, registrant_code,
                    ownership_share, role, created_at
             FROM writers
             WHERE composition_id = ?1
             ORDER BY position",
        )?;
        let writers = stmt
            .query_map([id.to_string()], row_to_writer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(writers)
    }

    /// Remove a writer credit.
    pub fn delete_writer(&self, id: &WriterId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM writers WHERE id = ?1", [id.to_string()])?;
        if changed == 0 {
            return Err(not_found("writer", id));
        }
        Ok(())
    }

    /// Load a composition and its writers with names and registrant codes
    /// resolved from linked profiles.
    ///
    /// Returns `Ok(None)` when the composition does not exist.
    pub fn load_export_source(&self, id: &CompositionId) -> Result<Option<ExportSource>> {
        let Some(composition) = self.get_composition(id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT w.id, w.composition_id, w.profile_id,
                    COALESCE(p.name, w.display_name),
                    COALESCE(p.registrant_code, w.registrant_code),
                    w.ownership_share, w.role, w.created_at
             FROM writers w
             LEFT JOIN profiles p ON p.id = w.profile_id
             WHERE w.composition_id = ?1
             ORDER BY w.position",
        )?;
        let writers = stmt
            .query_map([id.to_string()], row_to_writer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!(
            "Loaded composition {} with {} writer(s)",
            composition.id,
            writers.len()
        );

        Ok(Some(ExportSource {
            composition,
            writers,
        }))
    }
}

// Audit log
impl Database {
    /// Append an entry to the audit log.
    pub fn insert_audit_entry(&self, entry: &AuditEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO audit_log (actor, action, entity, entity_id, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                entry.actor,
                entry.action,
                entry.entity,
                entry.entity_id,
                serde_json::to_string(&entry.data)?,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get all audit entries for an entity, newest first.
    pub fn list_audit_entries(&self, entity: &str, entity_id: &str) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT actor, action, entity, entity_id, data, created_at
             FROM audit_log
             WHERE entity = ?1 AND entity_id = ?2
             ORDER BY created_at DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([entity, entity_id], row_to_audit_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn insert_composition_on(conn: &Connection, composition: &Composition) -> Result<()> {
    conn.execute(
        "INSERT INTO compositions (id, title, work_code, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            composition.id.to_string(),
            composition.title,
            composition.work_code,
            composition.created_at.to_rfc3339(),
            composition.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn insert_writer_on(conn: &Connection, writer: &Writer) -> Result<()> {
    conn.execute(
        "INSERT INTO writers (
            id, composition_id, profile_id, display_name, registrant_code,
            ownership_share, role, position, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            (SELECT COALESCE(MAX(position), 0) + 1 FROM writers WHERE composition_id = ?2),
            ?8
        )",
        rusqlite::params![
            writer.id.to_string(),
            writer.composition_id.to_string(),
            writer.profile_id.map(|id| id.to_string()),
            writer.display_name,
            writer.registrant_code,
            writer.ownership_share.as_str(),
            format!("{:?}", writer.role),
            writer.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn row_to_composition(row: &rusqlite::Row) -> rusqlite::Result<Composition> {
    Ok(Composition {
        id: parse_column(row, 0)?,
        title: row.get(1)?,
        work_code: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        updated_at: timestamp_column(row, 4)?,
    })
}

fn row_to_writer(row: &rusqlite::Row) -> rusqlite::Result<Writer> {
    let profile_id: Option<String> = row.get(2)?;
    let share: String = row.get(5)?;
    let role: String = row.get(6)?;

    Ok(Writer {
        id: parse_column(row, 0)?,
        composition_id: parse_column(row, 1)?,
        profile_id: profile_id
            .map(|s| parse_text(2, &s))
            .transpose()?,
        display_name: row.get(3)?,
        registrant_code: row.get(4)?,
        ownership_share: Share::from_stored(share),
        role: WriterRole::from_name(&role),
        created_at: timestamp_column(row, 7)?,
    })
}

fn row_to_audit_entry(row: &rusqlite::Row) -> rusqlite::Result<AuditEntry> {
    let data: String = row.get(4)?;
    Ok(AuditEntry {
        actor: row.get(0)?,
        action: row.get(1)?,
        entity: row.get(2)?,
        entity_id: row.get(3)?,
        data: serde_json::from_str(&data)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        created_at: timestamp_column(row, 5)?,
    })
}

fn parse_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    parse_text(idx, &text)
}

fn parse_text<T>(idx: usize, text: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn not_found(entity: &'static str, id: impl ToString) -> Error {
    Error::NotFound {
        entity,
        id: id.to_string(),
    }
}
