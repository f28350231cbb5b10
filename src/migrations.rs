//! `user_version`-tracked SQLite migrations shared by the history store and
//! the plugin data schema

use rusqlite::Connection;
use tracing::debug;

/// One entry per schema version, holding the statements that reach it
pub type Migrations = [&'static [&'static str]];

pub fn latest_version(migrations: &Migrations) -> i32 {
    migrations.len() as i32
}

/// Read the schema version without writing to the database
pub fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Apply every migration above the stored `user_version`
///
/// All pending steps and the version bump commit in one transaction. Returns
/// the version found before migrating.
pub fn apply(conn: &mut Connection, migrations: &Migrations, label: &str) -> rusqlite::Result<i32> {
    let tx = conn.transaction()?;
    let current_version = schema_version(&tx)?;
    let target_version = latest_version(migrations);

    for (i, statements) in migrations.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            for sql in *statements {
                tx.execute(sql, [])?;
            }
            debug!("Applied {} migration v{}", label, version);
        }
    }
    if target_version > current_version {
        tx.pragma_update(None, "user_version", target_version)?;
    }

    tx.commit()?;
    Ok(current_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: &Migrations = &[
        &["CREATE TABLE a (id INTEGER PRIMARY KEY)"],
        &["CREATE TABLE b (id INTEGER PRIMARY KEY)"],
    ];

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn apply_runs_pending_steps_and_bumps_version() {
        let mut conn = Connection::open_in_memory().unwrap();

        assert_eq!(apply(&mut conn, STEPS, "test").unwrap(), 0);
        assert_eq!(schema_version(&conn).unwrap(), 2);
        assert_eq!(table_count(&conn), 2);

        // Nothing left to do on the second run
        assert_eq!(apply(&mut conn, STEPS, "test").unwrap(), 2);
        assert_eq!(table_count(&conn), 2);
    }

    #[test]
    fn apply_skips_steps_at_or_below_stored_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        assert_eq!(apply(&mut conn, STEPS, "test").unwrap(), 1);
        let has_a: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'a')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!has_a);
        assert_eq!(schema_version(&conn).unwrap(), 2);
    }

    #[test]
    fn failing_step_rolls_back_every_pending_step() {
        let broken: &Migrations = &[
            &["CREATE TABLE a (id INTEGER PRIMARY KEY)"],
            &["CREATE TABLE b (id INTEGER PRIMARY KEY)", "NOT VALID SQL"],
        ];
        let mut conn = Connection::open_in_memory().unwrap();

        assert!(apply(&mut conn, broken, "test").is_err());
        assert_eq!(schema_version(&conn).unwrap(), 0);
        assert_eq!(table_count(&conn), 0);
    }
}
