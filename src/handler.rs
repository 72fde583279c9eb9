use std::sync::Arc;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use log::error;

use crate::errors::DBError;
use crate::DbPool;

pub trait WithDB {
    fn dbpool(&self) -> &DbPool;

    fn handle_errors(&self, e: diesel::result::Error) -> DBError {
        match e {
            diesel::result::Error::NotFound => DBError::not_found(),
            _ => {
                error!("{:?}", e);
                DBError::new()
            }
        }
    }

    fn dbconn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, DBError> {
        self.dbpool().get().map_err(|e| {
            error!("{:?}", e);
            DBError::new()
        })
    }

    fn run_txn<T, F>(&self, f: F) -> Result<T, DBError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, diesel::result::Error>,
    {
        let mut pooled = self.dbconn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction(|conn| f(conn))
            .map_err(|e| self.handle_errors(e))
    }
}

pub struct PortfolioDB {
    dbpool: Arc<DbPool>,
}

impl PortfolioDB {
    pub fn new(dbpool: Arc<DbPool>) -> Self {
        Self { dbpool }
    }
}

impl WithDB for PortfolioDB {
    fn dbpool(&self) -> &DbPool {
        &self.dbpool
    }
}
