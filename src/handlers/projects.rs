use std::sync::Arc;

use axum::response::IntoResponse;
use http::StatusCode;

use crate::handler::{PortfolioDB, WithDB};
use crate::models::Project;
use crate::templates;
use crate::view_models::ProjectCard;
use crate::DbPool;

pub async fn get_projects_handler(
    pool: Arc<DbPool>,
    templates: Arc<templates::Templates>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = PortfolioDB::new(pool);
    let mut conn = db.dbconn()?;

    let projects: Vec<ProjectCard> = Project::all(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(ProjectCard::from)
        .collect();

    super::render_page(&templates.add_context("projects", &projects), "projects.html", "Projects")
}
