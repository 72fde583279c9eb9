mod content;
mod inbox;
mod profile;

pub use content::{CategoryInput, PostInput, ProjectInput};
pub use inbox::{ContactInput, TestimonialInput};
pub use profile::{CertificationInput, EducationInput, ExperienceInput, SkillInput};

use diesel::prelude::*;
use serde::de::DeserializeOwned;

use super::config::AdminConfig;
use super::fields::Fields;
use crate::errors::FormError;

/// An entity the admin can list, create, edit, delete and run bulk actions on.
pub trait AdminEntity: Fields + Sized + Send + 'static {
    const ADMIN: AdminConfig;

    /// Body of the add/change form.
    type Input: DeserializeOwned + Send + 'static;

    /// Every record in the entity's default order.
    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>>;

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self>;

    fn pk(&self) -> i32;

    /// Short human-readable label for the record.
    fn title(&self) -> String;

    fn create(conn: &mut SqliteConnection, input: Self::Input) -> Result<(), FormError>;

    /// Writes every editable field. Readonly fields are left alone.
    fn update(conn: &mut SqliteConnection, id: i32, input: Self::Input) -> Result<(), FormError>;

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize>;

    /// Returns the number of affected rows. The caller has already checked
    /// that `action` is one of `ADMIN.actions`.
    fn run_action(conn: &mut SqliteConnection, action: &str, ids: &[i32]) -> QueryResult<usize> {
        match action {
            "delete_selected" => Self::delete(conn, ids),
            _ => Ok(0),
        }
    }
}

/// Maps "no row updated" onto `NotFound` so the handler can 404.
pub(crate) fn expect_updated(rows: usize) -> Result<(), FormError> {
    if rows == 0 {
        Err(FormError::Database(diesel::result::Error::NotFound))
    } else {
        Ok(())
    }
}
