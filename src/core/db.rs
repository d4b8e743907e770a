use tokio_rusqlite::Connection;

/// Open the session database, creating the file if needed.
pub async fn async_db(db_path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    Connection::open(db_path).await
}

/// Create the schema. Safe to call repeatedly.
pub fn initialize_db(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS session (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}
