use std::sync::Arc;

use axum::response::IntoResponse;
use http::StatusCode;

use crate::handler::{PortfolioDB, WithDB};
use crate::models::{Skill, Testimonial};
use crate::templates;
use crate::view_models::{SkillBar, TestimonialCard};
use crate::DbPool;

pub async fn get_about_handler(
    pool: Arc<DbPool>,
    templates: Arc<templates::Templates>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = PortfolioDB::new(pool);
    let mut conn = db.dbconn()?;

    let skills: Vec<SkillBar> = Skill::all(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(SkillBar::from)
        .collect();
    let testimonials: Vec<TestimonialCard> = Testimonial::featured(&mut conn)
        .map_err(|e| db.handle_errors(e))?
        .iter()
        .map(TestimonialCard::from)
        .collect();

    let template = templates
        .add_context("skills", &skills)
        .add_context("testimonials", &testimonials);

    super::render_page(&template, "about.html", "About")
}
