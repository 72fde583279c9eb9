use diesel::prelude::*;
use serde::Deserialize;

use super::{expect_updated, AdminEntity};
use crate::admin::config::{AdminConfig, FieldKind, FormField, ListFilter, DELETE_SELECTED, MARK_AS_READ, RATING_CHOICES};
use crate::admin::fields::{FieldValue, Fields};
use crate::errors::FormError;
use crate::forms;
use crate::models::{now, Contact, NewContact, NewTestimonial, Testimonial};
use crate::schema::{contacts, testimonials};

#[derive(Debug, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub is_read: bool,
}

impl ContactInput {
    fn validate(&self) -> Result<(&str, &str, &str, &str), FormError> {
        let name = forms::required(&self.name, "name")?;
        let email = forms::required(&self.email, "email")?;
        if !email.contains('@') {
            return Err(FormError::Invalid("email".into(), "enter a valid email address".into()));
        }
        let subject = forms::required(&self.subject, "subject")?;
        let message = forms::required(&self.message, "message")?;
        Ok((name, email, subject, message))
    }
}

impl Fields for Contact {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "email" => (&self.email).into(),
            "subject" => (&self.subject).into(),
            "message" => (&self.message).into(),
            "created_at" => self.created_at.into(),
            "is_read" => self.is_read.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Contact {
    const ADMIN: AdminConfig = AdminConfig {
        model: "contact",
        verbose_name: "contact message",
        verbose_name_plural: "contact messages",
        list_display: &["name", "email", "subject", "created_at", "is_read"],
        list_filter: &[ListFilter::Exact("is_read"), ListFilter::Date("created_at")],
        search_fields: &["name", "email", "subject", "message"],
        ordering: &["-created_at"],
        prepopulated_slug: None,
        readonly_fields: &["created_at"],
        fields: &[
            FormField::required("name", FieldKind::Text),
            FormField::required("email", FieldKind::Email),
            FormField::required("subject", FieldKind::Text),
            FormField::required("message", FieldKind::TextArea),
            FormField::optional("is_read", FieldKind::Bool),
        ],
        actions: &[DELETE_SELECTED, MARK_AS_READ],
    };

    type Input = ContactInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Contact::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        contacts::table.find(id).select(Contact::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: ContactInput) -> Result<(), FormError> {
        let (name, email, subject, message) = input.validate()?;
        Contact::insert(
            conn,
            &NewContact {
                name,
                email,
                subject,
                message,
                created_at: now(),
                is_read: input.is_read,
            },
        )?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: ContactInput) -> Result<(), FormError> {
        let (name, email, subject, message) = input.validate()?;
        let rows = diesel::update(contacts::table.find(id))
            .set((
                contacts::name.eq(name),
                contacts::email.eq(email),
                contacts::subject.eq(subject),
                contacts::message.eq(message),
                contacts::is_read.eq(input.is_read),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(contacts::table.filter(contacts::id.eq_any(ids))).execute(conn)
    }

    fn run_action(conn: &mut SqliteConnection, action: &str, ids: &[i32]) -> QueryResult<usize> {
        match action {
            "mark_as_read" => Contact::mark_as_read(conn, ids),
            "delete_selected" => Self::delete(conn, ids),
            _ => Ok(0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub is_featured: bool,
}

struct ValidTestimonial<'a> {
    name: &'a str,
    position: &'a str,
    company: &'a str,
    content: &'a str,
    rating: i32,
}

impl TestimonialInput {
    fn validate(&self) -> Result<ValidTestimonial<'_>, FormError> {
        let name = forms::required(&self.name, "name")?;
        let position = forms::required(&self.position, "position")?;
        let company = self.company.trim();
        let content = forms::required(&self.content, "content")?;
        let rating = self.rating.unwrap_or(5);
        if !Testimonial::is_valid_rating(rating) {
            return Err(FormError::Invalid("rating".into(), "choose a rating from 1 to 5".into()));
        }
        Ok(ValidTestimonial {
            name,
            position,
            company,
            content,
            rating,
        })
    }
}

impl Fields for Testimonial {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "position" => (&self.position).into(),
            "company" => (&self.company).into(),
            "image" => self.image.as_ref().into(),
            "content" => (&self.content).into(),
            "rating" => self.rating.into(),
            "is_featured" => self.is_featured.into(),
            "created_at" => self.created_at.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Testimonial {
    const ADMIN: AdminConfig = AdminConfig {
        model: "testimonial",
        verbose_name: "testimonial",
        verbose_name_plural: "testimonials",
        list_display: &["name", "company", "rating", "is_featured", "created_at"],
        list_filter: &[
            ListFilter::Exact("is_featured"),
            ListFilter::Exact("rating"),
            ListFilter::Date("created_at"),
        ],
        search_fields: &[],
        ordering: &["-created_at"],
        prepopulated_slug: None,
        readonly_fields: &["created_at"],
        fields: &[
            FormField::required("name", FieldKind::Text),
            FormField::required("position", FieldKind::Text),
            FormField::optional("company", FieldKind::Text),
            FormField::optional("image", FieldKind::Text),
            FormField::required("content", FieldKind::TextArea),
            FormField::required("rating", FieldKind::Choice(RATING_CHOICES)).initial("5"),
            FormField::optional("is_featured", FieldKind::Bool),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = TestimonialInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Testimonial::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        testimonials::table.find(id).select(Testimonial::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: TestimonialInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        Testimonial::insert(
            conn,
            &NewTestimonial {
                name: valid.name,
                position: valid.position,
                company: valid.company,
                image: forms::non_blank(&input.image),
                content: valid.content,
                rating: valid.rating,
                is_featured: input.is_featured,
                created_at: now(),
            },
        )?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: TestimonialInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        let rows = diesel::update(testimonials::table.find(id))
            .set((
                testimonials::name.eq(valid.name),
                testimonials::position.eq(valid.position),
                testimonials::company.eq(valid.company),
                testimonials::image.eq(forms::non_blank(&input.image)),
                testimonials::content.eq(valid.content),
                testimonials::rating.eq(valid.rating),
                testimonials::is_featured.eq(input.is_featured),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(testimonials::table.filter(testimonials::id.eq_any(ids))).execute(conn)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn testimonial_rating_outside_range_is_invalid() {
        let input = TestimonialInput {
            name: "Jane".into(),
            position: "CTO".into(),
            company: "Acme".into(),
            content: "Great work".into(),
            rating: Some(6),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(FormError::Invalid(field, _)) if field == "rating"));
    }

    #[test]
    fn testimonial_company_may_be_blank() {
        let input = TestimonialInput {
            name: "Jane".into(),
            position: "Freelancer".into(),
            company: "   ".into(),
            content: "Great work".into(),
            ..Default::default()
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.company, "");
        assert_eq!(valid.rating, 5);
    }

    #[test]
    fn contact_input_needs_an_email_address() {
        let input = ContactInput {
            name: "John".into(),
            email: "not-an-address".into(),
            subject: "Hi".into(),
            message: "Test".into(),
            is_read: false,
        };
        assert!(input.validate().is_err());
    }
}
