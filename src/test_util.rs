use std::path::Path;
use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;

use crate::config::SiteSection;
use crate::templates::Templates;
use crate::{new_migrated_pool, DbPool};

/// In-memory store with the schema applied. One connection, since every
/// `:memory:` connection is its own database.
pub fn test_pool() -> Arc<DbPool> {
    Arc::new(new_migrated_pool(":memory:", 1).unwrap())
}

pub fn test_conn() -> PooledConnection<ConnectionManager<SqliteConnection>> {
    test_pool().get().unwrap()
}

pub fn test_templates() -> Arc<Templates> {
    let site = SiteSection {
        site_name: "Test Portfolio".into(),
        menu_items: Vec::new(),
        socials: Vec::new(),
    };
    Arc::new(Templates::from_dir(Path::new(env!("CARGO_MANIFEST_DIR")), &site).unwrap())
}
