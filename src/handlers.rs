mod about;
mod contact;
mod index;
mod projects;
mod resume;

pub use about::get_about_handler;
pub use contact::{get_contact_handler, post_contact_handler, ContactForm};
pub use index::get_index_handler;
pub use projects::get_projects_handler;
pub use resume::get_resume_handler;

use axum::response::Html;
use http::StatusCode;
use log::error;

use crate::errors::TemplateError;
use crate::templates::Templates;

/// Renders `template` with `page_title` set, mapping failures to a 500.
pub(crate) fn render_page(
    templates: &Templates,
    template: &str,
    page_title: &str,
) -> Result<Html<String>, StatusCode> {
    let page = templates
        .add_context("page_title", page_title)
        .render(template)
        .map_err(|e| {
            error!("{:?}", e);
            TemplateError
        })?;
    Ok(Html(page))
}
