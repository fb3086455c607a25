use rusqlite::Connection;

pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS deliveries (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            kind            TEXT NOT NULL,
            screen          TEXT NOT NULL DEFAULT '',
            notification_id TEXT NOT NULL DEFAULT '',
            path            TEXT NOT NULL DEFAULT '',
            detail          TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_deliveries_created_at ON deliveries(created_at DESC);
        ",
    )?;

    Ok(())
}
