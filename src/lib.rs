#[macro_use]
extern crate diesel;

use diesel::connection::SimpleConnection;
use diesel::prelude::SqliteConnection;
use diesel::r2d2;

pub mod admin;
pub mod auth;
pub mod config;
pub mod constants;
pub mod errors;
pub mod forms;
pub mod handler;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod slug_util;
pub mod templates;
pub mod view_models;

#[cfg(test)]
mod test_util;

pub use crate::config::SiteConfig;
pub use crate::constants::*;

pub type DbPool = r2d2::Pool<r2d2::ConnectionManager<SqliteConnection>>;

const SCHEMA_SQL: &str = include_str!("../migrations/2024-01-01-000000_create_portfolio/up.sql");

/// Applied to every pooled connection so the store enforces the
/// cascade and set-null rules on `posts`.
#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn new_dbconn_pool_sized(db_file: &str, max_size: u32) -> Result<DbPool, anyhow::Error> {
    let manager = r2d2::ConnectionManager::<SqliteConnection>::new(db_file);
    Ok(r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?)
}

/// Creates any missing tables. Safe to run on every startup.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), anyhow::Error> {
    conn.batch_execute(SCHEMA_SQL)?;
    Ok(())
}

/// Pool whose store already has the schema applied.
pub fn new_migrated_pool(db_file: &str, max_size: u32) -> Result<DbPool, anyhow::Error> {
    let pool = new_dbconn_pool_sized(db_file, max_size)?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    drop(conn);
    Ok(pool)
}

pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod test {
    use diesel::prelude::*;

    use crate::schema::{categories, contacts};

    #[test]
    fn migrated_pool_has_the_schema() {
        let pool = super::new_migrated_pool(":memory:", 1).unwrap();
        let mut conn = pool.get().unwrap();

        let count: i64 = categories::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
        let count: i64 = contacts::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn migrations_can_be_rerun() {
        let pool = super::new_migrated_pool(":memory:", 1).unwrap();
        let mut conn = pool.get().unwrap();
        super::run_migrations(&mut conn).unwrap();
    }
}
