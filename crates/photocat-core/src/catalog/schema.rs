use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};

pub fn initialize(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS photos (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            fingerprint         TEXT UNIQUE,
            filename            TEXT NOT NULL,
            filepath            TEXT NOT NULL,
            size_mb             REAL,
            format              TEXT NOT NULL,
            date_created        TEXT,
            camera_model        TEXT,
            shutter_speed       TEXT,
            aperture            TEXT,
            rating              INTEGER NOT NULL DEFAULT 0,
            labels              TEXT NOT NULL DEFAULT '',
            marked_for_deletion INTEGER NOT NULL DEFAULT 0,
            do_not_delete       INTEGER NOT NULL DEFAULT 0,
            timestamp           TEXT
        );
        ",
    )?;
    Ok(())
}

/// Bring an existing catalog up to the current column set.
///
/// Runs after [`initialize`], so a fresh catalog passes through untouched.
pub fn migrate(conn: &Connection) -> StoreResult<()> {
    let columns = column_names(conn)?;

    for required in ["fingerprint", "filepath"] {
        if !columns.iter().any(|c| c == required) {
            return Err(StoreError::Corrupt(format!(
                "photos table has no {required} column"
            )));
        }
    }

    if !columns.iter().any(|c| c == "do_not_delete") {
        tracing::info!("Migrating catalog: adding do_not_delete column");
        conn.execute_batch(
            "ALTER TABLE photos ADD COLUMN do_not_delete INTEGER NOT NULL DEFAULT 0;",
        )?;
    }

    // Rows without a fingerprint are keyed by filepath
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_photos_filepath ON photos(filepath);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_photos_unfingerprinted
            ON photos(filepath) WHERE fingerprint IS NULL;
        ",
    )?;
    Ok(())
}

fn column_names(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(photos)")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}
