use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type DBConnection = Arc<Mutex<Connection>>;

pub fn create_tables(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            photo_url TEXT
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0
        )",
        params![],
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS tasks_owner_date ON tasks (owner_id, date)",
        params![],
    )?;

    Ok(())
}

pub fn open_database(path: &Path) -> rusqlite::Result<DBConnection> {
    let connection = Connection::open(path)?;
    connection.pragma_update(None, "foreign_keys", true)?;
    create_tables(&connection)?;

    Ok(Arc::new(Mutex::new(connection)))
}

#[cfg(test)]
pub fn open_test_database() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory database");
    create_tables(&connection).expect("schema");
    connection
}
