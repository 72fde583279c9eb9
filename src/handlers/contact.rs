use std::sync::Arc;

use axum::response::{Html, IntoResponse};
use bytes::Bytes;
use http::StatusCode;
use log::info;
use serde::Serialize;
use url::form_urlencoded::parse;

use crate::templates;
use crate::CONTACT_SUCCESS_MESSAGE;

/// A contact-page submission. Every field is required; nothing is stored.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn from_form_bytes(b: &[u8]) -> Self {
        let mut form = ContactForm::default();
        for (k, v) in parse(b) {
            match &*k {
                "name" => form.name = v.trim().to_string(),
                "email" => form.email = v.trim().to_string(),
                "subject" => form.subject = v.trim().to_string(),
                "message" => form.message = v.trim().to_string(),
                _ => (),
            }
        }
        form
    }

    /// Names of the fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect()
    }
}

pub async fn get_contact_handler(
    templates: Arc<templates::Templates>,
) -> Result<impl IntoResponse, StatusCode> {
    super::render_page(
        &templates.add_context("form", &ContactForm::default()),
        "contact.html",
        "Contact",
    )
}

pub async fn post_contact_handler(
    templates: Arc<templates::Templates>,
    body: Bytes,
) -> Result<impl IntoResponse, StatusCode> {
    let form = ContactForm::from_form_bytes(&body);
    let missing = form.missing_fields();

    if !missing.is_empty() {
        info!("rejected contact submission missing {:?}", missing);
        let page: Html<String> = super::render_page(
            &templates
                .add_context("form", &form)
                .add_context("missing_fields", &missing),
            "contact.html",
            "Contact",
        )?;
        return Ok((StatusCode::BAD_REQUEST, page));
    }

    info!("contact submission from {:?} about {:?}", form.email, form.subject);
    let page = super::render_page(
        &templates
            .add_context("form", &ContactForm::default())
            .add_context("success", &true)
            .add_context("message", CONTACT_SUCCESS_MESSAGE),
        "contact.html",
        "Contact",
    )?;
    Ok((StatusCode::OK, page))
}

#[cfg(test)]
mod test {
    use super::ContactForm;

    #[test]
    fn contact_form_decode_all_fields() {
        let qs = b"name=John&email=j%40x.com&subject=Hi&message=Test+message";
        let form = ContactForm {
            name: "John".into(),
            email: "j@x.com".into(),
            subject: "Hi".into(),
            message: "Test message".into(),
        };

        assert_eq!(form, ContactForm::from_form_bytes(&qs[..]));
        assert!(form.missing_fields().is_empty());
    }

    #[test]
    fn contact_form_missing_fields_default_empty() {
        let form = ContactForm::from_form_bytes(b"name=John&subject=%20%20");

        assert_eq!(form.email, "");
        assert_eq!(form.missing_fields(), vec!["email", "subject", "message"]);
    }

    #[test]
    fn contact_form_ignores_unknown_fields() {
        let form = ContactForm::from_form_bytes(b"csrf=abc&name=Jane&email=jane@example.com&subject=Hello&message=Hi");

        assert_eq!(form.name, "Jane");
        assert!(form.missing_fields().is_empty());
    }
}
