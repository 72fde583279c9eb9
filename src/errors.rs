use axum::response::{IntoResponse, Response};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use http::{header, StatusCode};
use thiserror::Error;

#[derive(Debug)]
pub struct DBError {
    not_found: bool,
}
impl DBError {
    pub fn new() -> Self {
        DBError { not_found: false }
    }

    pub fn not_found() -> Self {
        DBError { not_found: true }
    }
}
impl From<DBError> for StatusCode {
    fn from(e: DBError) -> Self {
        if e.not_found {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Debug)]
pub struct TemplateError;
impl From<TemplateError> for StatusCode {
    fn from(_e: TemplateError) -> Self {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Missing or rejected admin credentials. Carries the Basic realm so the
/// browser can prompt again.
#[derive(Debug)]
pub struct NotAuthorized {
    pub realm: String,
}
impl IntoResponse for NotAuthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\", charset=\"UTF-8\"", self.realm),
            )],
            "Not Authorized",
        )
            .into_response()
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Required field '{0}' is missing.")]
    MissingField(String),

    #[error("Field '{0}' is invalid: {1}")]
    Invalid(String, String),

    #[error("A record with this {0} already exists.")]
    Duplicate(String),

    #[error(transparent)]
    Database(#[from] DieselError),
}

impl FormError {
    /// Maps a unique-constraint failure onto the field the user can fix;
    /// anything else stays a database error.
    pub fn from_write(e: DieselError, unique_field: &str) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                FormError::Duplicate(unique_field.into())
            }
            other => FormError::Database(other),
        }
    }
}

#[cfg(test)]
mod test {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use http::StatusCode;

    use super::{DBError, FormError};

    #[test]
    fn db_errors_map_to_status_codes() {
        assert_eq!(StatusCode::from(DBError::not_found()), StatusCode::NOT_FOUND);
        assert_eq!(StatusCode::from(DBError::new()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_violations_name_the_field() {
        let e = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(String::from("UNIQUE")));
        let form_error = FormError::from_write(e, "slug");
        assert_eq!(form_error.to_string(), "A record with this slug already exists.");

        assert!(matches!(
            FormError::from_write(DieselError::NotFound, "slug"),
            FormError::Database(DieselError::NotFound)
        ));
    }
}
