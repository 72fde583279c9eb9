use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::categories;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = categories, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub created_at: NaiveDateTime,
}

impl Category {
    /// Ordered by name.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Category>> {
        categories::table
            .order(categories::name.asc())
            .select(Category::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_category: &NewCategory) -> QueryResult<usize> {
        diesel::insert_into(categories::table)
            .values(new_category)
            .execute(conn)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
