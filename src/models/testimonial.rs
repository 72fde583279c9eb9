use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::testimonials;

pub const RATING_CHOICES: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = testimonials, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Testimonial {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub company: String,
    pub image: Option<String>,
    pub content: String,
    /// 1 through 5; enforced by a CHECK constraint.
    pub rating: i32,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = testimonials)]
pub struct NewTestimonial<'a> {
    pub name: &'a str,
    pub position: &'a str,
    pub company: &'a str,
    pub image: Option<&'a str>,
    pub content: &'a str,
    pub rating: i32,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
}

impl Testimonial {
    pub fn is_valid_rating(rating: i32) -> bool {
        RATING_CHOICES.contains(&rating)
    }

    /// Newest first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Testimonial>> {
        testimonials::table
            .order(testimonials::created_at.desc())
            .select(Testimonial::as_select())
            .load(conn)
    }

    pub fn featured(conn: &mut SqliteConnection) -> QueryResult<Vec<Testimonial>> {
        testimonials::table
            .filter(testimonials::is_featured.eq(true))
            .order(testimonials::created_at.desc())
            .select(Testimonial::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_testimonial: &NewTestimonial) -> QueryResult<usize> {
        diesel::insert_into(testimonials::table)
            .values(new_testimonial)
            .execute(conn)
    }
}

impl std::fmt::Display for Testimonial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.company)
    }
}
