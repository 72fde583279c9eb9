use diesel::prelude::*;
use serde::Serialize;

use crate::schema::education;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = education, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Education {
    pub id: i32,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub description: String,
    pub grade: String,
    pub display_order: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = education)]
pub struct NewEducation<'a> {
    pub degree: &'a str,
    pub institution: &'a str,
    pub location: &'a str,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub description: &'a str,
    pub grade: &'a str,
    pub display_order: i32,
}

impl Education {
    pub fn year_range(&self) -> String {
        match self.end_year {
            Some(end) => format!("{} - {}", self.start_year, end),
            None => format!("{} - Present", self.start_year),
        }
    }

    /// Latest end year first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Education>> {
        education::table
            .order(education::end_year.desc())
            .select(Education::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_education: &NewEducation) -> QueryResult<usize> {
        diesel::insert_into(education::table)
            .values(new_education)
            .execute(conn)
    }
}

impl std::fmt::Display for Education {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.degree, self.institution)
    }
}
