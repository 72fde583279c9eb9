use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::certifications;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = certifications, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Certification {
    pub id: i32,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: String,
    pub credential_url: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = certifications)]
pub struct NewCertification<'a> {
    pub name: &'a str,
    pub issuing_organization: &'a str,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: &'a str,
    pub credential_url: &'a str,
}

impl Certification {
    /// Most recently issued first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Certification>> {
        certifications::table
            .order(certifications::issue_date.desc())
            .select(Certification::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_certification: &NewCertification) -> QueryResult<usize> {
        diesel::insert_into(certifications::table)
            .values(new_certification)
            .execute(conn)
    }
}
