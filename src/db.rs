use anyhow::Result;
use rusqlite::Connection;

const DB_PATH: &str = "data/oferta.sqlite";

pub fn connect() -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS raw_rows (
            id         INTEGER PRIMARY KEY,
            source     TEXT NOT NULL,
            page       INTEGER,
            cells      TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_raw_rows_source ON raw_rows(source);
        ",
    )?;
    Ok(())
}

/// Drop previously staged rows for a source so re-running extract/import
/// replaces them instead of appending duplicates.
pub fn clear_source(conn: &Connection, source: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM raw_rows WHERE source = ?1", [source])?;
    Ok(deleted)
}

/// Stage cleaned rows in input order; cells are stored as a JSON array.
pub fn insert_rows(
    conn: &Connection,
    source: &str,
    page: Option<i64>,
    rows: &[Vec<String>],
) -> Result<usize> {
    let mut stmt = conn.prepare("INSERT INTO raw_rows (source, page, cells) VALUES (?1, ?2, ?3)")?;
    for row in rows {
        stmt.execute(rusqlite::params![source, page, serde_json::to_string(row)?])?;
    }
    Ok(rows.len())
}

/// Staged rows in insertion order (page order, then row order within a page).
pub fn fetch_rows(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut stmt = conn.prepare("SELECT cells FROM raw_rows ORDER BY id")?;
    let encoded = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
    encoded
        .iter()
        .map(|cells| serde_json::from_str(cells).map_err(anyhow::Error::from))
        .collect()
}
