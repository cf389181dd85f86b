use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreResult;
use crate::types::{PhotoRecord, MAX_RATING};

use super::{schema, CatalogStore};

const COLUMNS: &str = "fingerprint, filename, filepath, size_mb, format, date_created, camera_model,
     shutter_speed, aperture, rating, labels, marked_for_deletion, do_not_delete, timestamp";

const UPSERT_BY_FINGERPRINT: &str = "
    INSERT INTO photos (fingerprint, filename, filepath, size_mb, format, date_created, camera_model,
                        shutter_speed, aperture, rating, labels, marked_for_deletion, do_not_delete, timestamp)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
    ON CONFLICT(fingerprint) DO UPDATE SET
        filename=excluded.filename, filepath=excluded.filepath, size_mb=excluded.size_mb,
        format=excluded.format, date_created=excluded.date_created,
        camera_model=excluded.camera_model, shutter_speed=excluded.shutter_speed,
        aperture=excluded.aperture, rating=excluded.rating, labels=excluded.labels,
        marked_for_deletion=excluded.marked_for_deletion,
        do_not_delete=excluded.do_not_delete, timestamp=excluded.timestamp";

const UPSERT_BY_FILEPATH: &str = "
    INSERT INTO photos (fingerprint, filename, filepath, size_mb, format, date_created, camera_model,
                        shutter_speed, aperture, rating, labels, marked_for_deletion, do_not_delete, timestamp)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
    ON CONFLICT(filepath) WHERE fingerprint IS NULL DO UPDATE SET
        filename=excluded.filename, size_mb=excluded.size_mb,
        format=excluded.format, date_created=excluded.date_created,
        camera_model=excluded.camera_model, shutter_speed=excluded.shutter_speed,
        aperture=excluded.aperture, rating=excluded.rating, labels=excluded.labels,
        marked_for_deletion=excluded.marked_for_deletion,
        do_not_delete=excluded.do_not_delete, timestamp=excluded.timestamp";

/// SQLite-backed photo catalog.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open or create a catalog at the given path with WAL mode.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        tracing::debug!("Opened catalog at {:?}", path);
        Ok(Self { conn })
    }

    /// Open an in-memory catalog (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }
}

impl CatalogStore for SqliteCatalog {
    fn upsert(&mut self, record: &PhotoRecord) -> StoreResult<()> {
        let filepath = record.filepath.to_string_lossy().into_owned();
        let now = Utc::now();
        let values = params![
            record.fingerprint,
            record.filename,
            filepath,
            record.size_mb,
            record.format,
            record.date_created,
            record.camera_model,
            record.shutter_speed,
            record.aperture,
            record.rating,
            record.labels,
            record.marked_for_deletion,
            record.do_not_delete,
            now,
        ];

        let tx = self.conn.transaction()?;
        if record.fingerprint.is_some() {
            // A repaired file supersedes its unreadable placeholder
            let removed = tx.execute(
                "DELETE FROM photos WHERE fingerprint IS NULL AND filepath = ?1",
                params![filepath],
            )?;
            if removed > 0 {
                tracing::debug!("Replaced placeholder row for {}", filepath);
            }
            tx.execute(UPSERT_BY_FINGERPRINT, values)?;
        } else {
            tx.execute(UPSERT_BY_FILEPATH, values)?;
        }
        tx.commit()?;

        tracing::trace!("Upserted {} ({:?})", record.filename, record.fingerprint);
        Ok(())
    }

    fn get(&self, fingerprint: &str) -> StoreResult<Option<PhotoRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM photos WHERE fingerprint = ?1"),
                params![fingerprint],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn list(&self) -> StoreResult<Vec<PhotoRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM photos ORDER BY filepath, id"))?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PhotoRecord> {
    let rating: i64 = row.get(9)?;
    let rating = u8::try_from(rating)
        .ok()
        .filter(|r| *r <= MAX_RATING)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(9, rating))?;

    Ok(PhotoRecord {
        fingerprint: row.get(0)?,
        filename: row.get(1)?,
        filepath: PathBuf::from(row.get::<_, String>(2)?),
        size_mb: row.get(3)?,
        format: row.get(4)?,
        date_created: row.get(5)?,
        camera_model: row.get(6)?,
        shutter_speed: row.get(7)?,
        aperture: row.get(8)?,
        rating,
        labels: row.get(10)?,
        marked_for_deletion: row.get(11)?,
        do_not_delete: row.get(12)?,
        timestamp: row.get(13)?,
    })
}
