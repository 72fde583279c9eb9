use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::contacts;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = contacts, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contacts)]
pub struct NewContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
}

impl Contact {
    /// Newest first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Contact>> {
        contacts::table
            .order(contacts::created_at.desc())
            .select(Contact::as_select())
            .load(conn)
    }

    pub fn by_email(conn: &mut SqliteConnection, email: &str) -> QueryResult<Option<Contact>> {
        contacts::table
            .filter(contacts::email.eq(email))
            .select(Contact::as_select())
            .first(conn)
            .optional()
    }

    pub fn insert(conn: &mut SqliteConnection, new_contact: &NewContact) -> QueryResult<usize> {
        diesel::insert_into(contacts::table)
            .values(new_contact)
            .execute(conn)
    }

    /// Sets `is_read` on exactly the given ids. Returns the number of rows touched.
    pub fn mark_as_read(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::update(contacts::table.filter(contacts::id.eq_any(ids)))
            .set(contacts::is_read.eq(true))
            .execute(conn)
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.subject)
    }
}
