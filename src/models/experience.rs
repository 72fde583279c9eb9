use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::experiences;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = experiences, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Experience {
    pub id: i32,
    pub position: String,
    pub company: String,
    pub location: String,
    pub start_date: NaiveDate,
    /// `None` while the role is current.
    pub end_date: Option<NaiveDate>,
    pub description: String,
    /// One responsibility per line.
    pub responsibilities: String,
    pub is_current: bool,
    pub display_order: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = experiences)]
pub struct NewExperience<'a> {
    pub position: &'a str,
    pub company: &'a str,
    pub location: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: &'a str,
    pub responsibilities: &'a str,
    pub is_current: bool,
    pub display_order: i32,
}

impl Experience {
    pub fn responsibilities_list(&self) -> Vec<String> {
        split_responsibilities(&self.responsibilities)
    }

    /// "2023 - Present" for current roles, "2022 - 2023" otherwise.
    pub fn period(&self) -> String {
        match (self.is_current, self.end_date) {
            (false, Some(end)) => format!("{} - {}", self.start_date.year(), end.year()),
            _ => format!("{} - Present", self.start_date.year()),
        }
    }

    /// Newest start date first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Experience>> {
        experiences::table
            .order(experiences::start_date.desc())
            .select(Experience::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_experience: &NewExperience) -> QueryResult<usize> {
        diesel::insert_into(experiences::table)
            .values(new_experience)
            .execute(conn)
    }
}

impl std::fmt::Display for Experience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.position, self.company)
    }
}

pub fn split_responsibilities(responsibilities: &str) -> Vec<String> {
    responsibilities
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
