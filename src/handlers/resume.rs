use std::sync::Arc;

use axum::response::IntoResponse;
use http::StatusCode;

use crate::handler::{PortfolioDB, WithDB};
use crate::models::{Certification, Education, Experience};
use crate::templates;
use crate::view_models::{CertificationEntry, EducationEntry, ExperienceEntry};
use crate::DbPool;

pub async fn get_resume_handler(
    pool: Arc<DbPool>,
    templates: Arc<templates::Templates>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = PortfolioDB::new(pool);
    let mut conn = db.dbconn()?;

    let education: Vec<EducationEntry> = Education::all(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(EducationEntry::from)
        .collect();
    let experience: Vec<ExperienceEntry> = Experience::all(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(ExperienceEntry::from)
        .collect();
    let certifications: Vec<CertificationEntry> = Certification::all(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(CertificationEntry::from)
        .collect();

    let template = templates
        .add_context("education", &education)
        .add_context("experience", &experience)
        .add_context("certifications", &certifications);

    super::render_page(&template, "resume.html", "Resume")
}
