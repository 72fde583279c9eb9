use std::sync::Arc;

use axum::response::IntoResponse;
use http::StatusCode;

use crate::handler::{PortfolioDB, WithDB};
use crate::models::Post;
use crate::templates;
use crate::view_models::{FeaturedPost, RecentPost};
use crate::{DbPool, FEATURED_POSTS_LIMIT, RECENT_POSTS_LIMIT};

pub async fn get_index_handler(
    pool: Arc<DbPool>,
    templates: Arc<templates::Templates>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = PortfolioDB::new(pool);
    let mut conn = db.dbconn()?;

    let featured_posts: Vec<FeaturedPost> = Post::featured(&mut conn, FEATURED_POSTS_LIMIT)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(FeaturedPost::from)
        .collect();

    let recent_posts: Vec<RecentPost> = Post::recent(&mut conn, RECENT_POSTS_LIMIT)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(RecentPost::from)
        .collect();

    let template = templates
        .add_context("featured_posts", &featured_posts)
        .add_context("recent_posts", &recent_posts);

    super::render_page(&template, "index.html", "Home")
}
