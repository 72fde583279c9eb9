use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::projects;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = projects, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Comma-separated.
    pub technologies: String,
    pub image: Option<String>,
    pub demo_link: Option<String>,
    pub github_link: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProject<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub technologies: &'a str,
    pub image: Option<&'a str>,
    pub demo_link: Option<&'a str>,
    pub github_link: Option<&'a str>,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Project {
    pub fn technologies_list(&self) -> Vec<String> {
        split_technologies(&self.technologies)
    }

    /// Ordered by display order, then newest first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Project>> {
        projects::table
            .order((projects::display_order.asc(), projects::created_at.desc()))
            .select(Project::as_select())
            .load(conn)
    }

    pub fn by_title(conn: &mut SqliteConnection, title: &str) -> QueryResult<Option<Project>> {
        projects::table
            .filter(projects::title.eq(title))
            .select(Project::as_select())
            .first(conn)
            .optional()
    }

    pub fn insert(conn: &mut SqliteConnection, new_project: &NewProject) -> QueryResult<usize> {
        diesel::insert_into(projects::table)
            .values(new_project)
            .execute(conn)
    }
}

pub fn split_technologies(technologies: &str) -> Vec<String> {
    technologies
        .split(',')
        .map(|tech| tech.trim().to_string())
        .collect()
}
