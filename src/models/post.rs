use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::{categories, posts, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = posts, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub excerpt: String,
    pub content: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub excerpt: &'a str,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub is_featured: bool,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published: bool,
}

/// A post joined with its author's username and its category name.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: String,
    pub category: Option<String>,
}

impl From<(Post, String, Option<String>)> for PostSummary {
    fn from((post, author, category): (Post, String, Option<String>)) -> Self {
        Self {
            post,
            author,
            category,
        }
    }
}

impl Post {
    /// Every post with author and category, newest first.
    pub fn summaries(conn: &mut SqliteConnection) -> QueryResult<Vec<PostSummary>> {
        let rows: Vec<(Post, String, Option<String>)> = posts::table
            .inner_join(users::table)
            .left_join(categories::table)
            .order(posts::created_at.desc())
            .select((Post::as_select(), users::username, categories::name.nullable()))
            .load(conn)?;
        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    pub fn summary(conn: &mut SqliteConnection, post_id: i32) -> QueryResult<PostSummary> {
        let row: (Post, String, Option<String>) = posts::table
            .inner_join(users::table)
            .left_join(categories::table)
            .filter(posts::id.eq(post_id))
            .select((Post::as_select(), users::username, categories::name.nullable()))
            .first(conn)?;
        Ok(row.into())
    }

    /// Published posts flagged as featured, newest first.
    pub fn featured(conn: &mut SqliteConnection, limit: i64) -> QueryResult<Vec<PostSummary>> {
        let rows: Vec<(Post, String, Option<String>)> = posts::table
            .inner_join(users::table)
            .left_join(categories::table)
            .filter(posts::published.eq(true))
            .filter(posts::is_featured.eq(true))
            .order(posts::created_at.desc())
            .limit(limit)
            .select((Post::as_select(), users::username, categories::name.nullable()))
            .load(conn)?;
        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    /// Published posts, newest first.
    pub fn recent(conn: &mut SqliteConnection, limit: i64) -> QueryResult<Vec<PostSummary>> {
        let rows: Vec<(Post, String, Option<String>)> = posts::table
            .inner_join(users::table)
            .left_join(categories::table)
            .filter(posts::published.eq(true))
            .order(posts::created_at.desc())
            .limit(limit)
            .select((Post::as_select(), users::username, categories::name.nullable()))
            .load(conn)?;
        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    pub fn by_title(conn: &mut SqliteConnection, title: &str) -> QueryResult<Option<Post>> {
        posts::table
            .filter(posts::title.eq(title))
            .select(Post::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Post>> {
        posts::table
            .filter(posts::slug.eq(slug))
            .select(Post::as_select())
            .first(conn)
            .optional()
    }

    pub fn insert(conn: &mut SqliteConnection, new_post: &NewPost) -> QueryResult<usize> {
        diesel::insert_into(posts::table).values(new_post).execute(conn)
    }
}
