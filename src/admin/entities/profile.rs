use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Deserialize;

use super::{expect_updated, AdminEntity};
use crate::admin::config::{AdminConfig, FieldKind, FormField, ListFilter, DELETE_SELECTED, SKILL_CATEGORY_CHOICES};
use crate::admin::fields::{FieldValue, Fields};
use crate::errors::FormError;
use crate::forms;
use crate::models::{
    Certification, Education, Experience, NewCertification, NewEducation, NewExperience, NewSkill, Skill,
    SkillCategory,
};
use crate::schema::{certifications, education, experiences, skills};

#[derive(Debug, Default, Deserialize)]
pub struct SkillInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub percentage: Option<i32>,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub display_order: Option<i32>,
}

impl SkillInput {
    fn validate(&self) -> Result<(&str, i32, SkillCategory), FormError> {
        let name = forms::required(&self.name, "name")?;
        let percentage = forms::required_value(self.percentage, "percentage")?;
        let category = forms::required(&self.category, "category")?
            .parse::<SkillCategory>()
            .map_err(|e| FormError::Invalid("category".into(), e))?;
        Ok((name, percentage, category))
    }
}

impl Fields for Skill {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "percentage" => self.percentage.into(),
            "category" => self.category.as_str().into(),
            "display_order" => self.display_order.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Skill {
    const ADMIN: AdminConfig = AdminConfig {
        model: "skill",
        verbose_name: "skill",
        verbose_name_plural: "skills",
        list_display: &["name", "percentage", "category", "display_order"],
        list_filter: &[ListFilter::Exact("category")],
        search_fields: &[],
        ordering: &["display_order", "category"],
        prepopulated_slug: None,
        readonly_fields: &[],
        fields: &[
            FormField::required("name", FieldKind::Text),
            FormField::required("percentage", FieldKind::Int).help("Proficiency from 0 to 100."),
            FormField::required("category", FieldKind::Choice(SKILL_CATEGORY_CHOICES)),
            FormField::optional("display_order", FieldKind::Int).initial("0"),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = SkillInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Skill::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        skills::table.find(id).select(Skill::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: SkillInput) -> Result<(), FormError> {
        let (name, percentage, category) = input.validate()?;
        Skill::insert(
            conn,
            &NewSkill {
                name,
                percentage,
                category,
                display_order: input.display_order.unwrap_or(0),
            },
        )?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: SkillInput) -> Result<(), FormError> {
        let (name, percentage, category) = input.validate()?;
        let rows = diesel::update(skills::table.find(id))
            .set((
                skills::name.eq(name),
                skills::percentage.eq(percentage),
                skills::category.eq(category),
                skills::display_order.eq(input.display_order.unwrap_or(0)),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(skills::table.filter(skills::id.eq_any(ids))).execute(conn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub is_current: bool,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub display_order: Option<i32>,
}

impl ExperienceInput {
    fn validate(&self) -> Result<NewExperience<'_>, FormError> {
        let start_date = forms::required_value(self.start_date, "start_date")?;
        Ok(NewExperience {
            position: forms::required(&self.position, "position")?,
            company: forms::required(&self.company, "company")?,
            location: self.location.trim(),
            start_date,
            end_date: self.end_date,
            description: forms::required(&self.description, "description")?,
            responsibilities: forms::required(&self.responsibilities, "responsibilities")?,
            is_current: self.is_current,
            display_order: self.display_order.unwrap_or(0),
        })
    }
}

impl Fields for Experience {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "position" => (&self.position).into(),
            "company" => (&self.company).into(),
            "location" => (&self.location).into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            "description" => (&self.description).into(),
            "responsibilities" => (&self.responsibilities).into(),
            "is_current" => self.is_current.into(),
            "display_order" => self.display_order.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Experience {
    const ADMIN: AdminConfig = AdminConfig {
        model: "experience",
        verbose_name: "experience",
        verbose_name_plural: "experiences",
        list_display: &["position", "company", "start_date", "end_date", "is_current"],
        list_filter: &[ListFilter::Exact("is_current"), ListFilter::Date("start_date")],
        search_fields: &[],
        ordering: &["-start_date"],
        prepopulated_slug: None,
        readonly_fields: &[],
        fields: &[
            FormField::required("position", FieldKind::Text),
            FormField::required("company", FieldKind::Text),
            FormField::optional("location", FieldKind::Text),
            FormField::required("start_date", FieldKind::Date),
            FormField::optional("end_date", FieldKind::Date).help("Leave blank for a current role."),
            FormField::required("description", FieldKind::TextArea),
            FormField::required("responsibilities", FieldKind::TextArea).help("One per line."),
            FormField::optional("is_current", FieldKind::Bool),
            FormField::optional("display_order", FieldKind::Int).initial("0"),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = ExperienceInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Experience::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        experiences::table.find(id).select(Experience::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: ExperienceInput) -> Result<(), FormError> {
        Experience::insert(conn, &input.validate()?)?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: ExperienceInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        let rows = diesel::update(experiences::table.find(id))
            .set((
                experiences::position.eq(valid.position),
                experiences::company.eq(valid.company),
                experiences::location.eq(valid.location),
                experiences::start_date.eq(valid.start_date),
                experiences::end_date.eq(valid.end_date),
                experiences::description.eq(valid.description),
                experiences::responsibilities.eq(valid.responsibilities),
                experiences::is_current.eq(valid.is_current),
                experiences::display_order.eq(valid.display_order),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(experiences::table.filter(experiences::id.eq_any(ids))).execute(conn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationInput {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub start_year: Option<i32>,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub display_order: Option<i32>,
}

impl EducationInput {
    fn validate(&self) -> Result<NewEducation<'_>, FormError> {
        Ok(NewEducation {
            degree: forms::required(&self.degree, "degree")?,
            institution: forms::required(&self.institution, "institution")?,
            location: self.location.trim(),
            start_year: forms::required_value(self.start_year, "start_year")?,
            end_year: self.end_year,
            description: self.description.trim(),
            grade: self.grade.trim(),
            display_order: self.display_order.unwrap_or(0),
        })
    }
}

impl Fields for Education {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "degree" => (&self.degree).into(),
            "institution" => (&self.institution).into(),
            "location" => (&self.location).into(),
            "start_year" => self.start_year.into(),
            "end_year" => self.end_year.into(),
            "description" => (&self.description).into(),
            "grade" => (&self.grade).into(),
            "display_order" => self.display_order.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Education {
    const ADMIN: AdminConfig = AdminConfig {
        model: "education",
        verbose_name: "education",
        verbose_name_plural: "education",
        list_display: &["degree", "institution", "start_year", "end_year"],
        list_filter: &[],
        search_fields: &[],
        ordering: &["-end_year"],
        prepopulated_slug: None,
        readonly_fields: &[],
        fields: &[
            FormField::required("degree", FieldKind::Text),
            FormField::required("institution", FieldKind::Text),
            FormField::optional("location", FieldKind::Text),
            FormField::required("start_year", FieldKind::Int),
            FormField::optional("end_year", FieldKind::Int).help("Leave blank if ongoing."),
            FormField::optional("description", FieldKind::TextArea),
            FormField::optional("grade", FieldKind::Text),
            FormField::optional("display_order", FieldKind::Int).initial("0"),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = EducationInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Education::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        education::table.find(id).select(Education::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: EducationInput) -> Result<(), FormError> {
        Education::insert(conn, &input.validate()?)?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: EducationInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        let rows = diesel::update(education::table.find(id))
            .set((
                education::degree.eq(valid.degree),
                education::institution.eq(valid.institution),
                education::location.eq(valid.location),
                education::start_year.eq(valid.start_year),
                education::end_year.eq(valid.end_year),
                education::description.eq(valid.description),
                education::grade.eq(valid.grade),
                education::display_order.eq(valid.display_order),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(education::table.filter(education::id.eq_any(ids))).execute(conn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CertificationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuing_organization: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub credential_id: String,
    #[serde(default)]
    pub credential_url: String,
}

impl CertificationInput {
    fn validate(&self) -> Result<NewCertification<'_>, FormError> {
        Ok(NewCertification {
            name: forms::required(&self.name, "name")?,
            issuing_organization: forms::required(&self.issuing_organization, "issuing_organization")?,
            issue_date: forms::required_value(self.issue_date, "issue_date")?,
            expiry_date: self.expiry_date,
            credential_id: self.credential_id.trim(),
            credential_url: self.credential_url.trim(),
        })
    }
}

impl Fields for Certification {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "issuing_organization" => (&self.issuing_organization).into(),
            "issue_date" => self.issue_date.into(),
            "expiry_date" => self.expiry_date.into(),
            "credential_id" => (&self.credential_id).into(),
            "credential_url" => (&self.credential_url).into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Certification {
    const ADMIN: AdminConfig = AdminConfig {
        model: "certification",
        verbose_name: "certification",
        verbose_name_plural: "certifications",
        list_display: &["name", "issuing_organization", "issue_date", "expiry_date"],
        list_filter: &[],
        search_fields: &[],
        ordering: &["-issue_date"],
        prepopulated_slug: None,
        readonly_fields: &[],
        fields: &[
            FormField::required("name", FieldKind::Text),
            FormField::required("issuing_organization", FieldKind::Text),
            FormField::required("issue_date", FieldKind::Date),
            FormField::optional("expiry_date", FieldKind::Date),
            FormField::optional("credential_id", FieldKind::Text),
            FormField::optional("credential_url", FieldKind::Url),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = CertificationInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Certification::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        certifications::table.find(id).select(Certification::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn create(conn: &mut SqliteConnection, input: CertificationInput) -> Result<(), FormError> {
        Certification::insert(conn, &input.validate()?)?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: CertificationInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        let rows = diesel::update(certifications::table.find(id))
            .set((
                certifications::name.eq(valid.name),
                certifications::issuing_organization.eq(valid.issuing_organization),
                certifications::issue_date.eq(valid.issue_date),
                certifications::expiry_date.eq(valid.expiry_date),
                certifications::credential_id.eq(valid.credential_id),
                certifications::credential_url.eq(valid.credential_url),
            ))
            .execute(conn)?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(certifications::table.filter(certifications::id.eq_any(ids))).execute(conn)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skill_input_rejects_unknown_category() {
        let input = SkillInput {
            name: "Rust".into(),
            percentage: Some(80),
            category: "devops".into(),
            display_order: None,
        };
        assert!(matches!(input.validate(), Err(FormError::Invalid(field, _)) if field == "category"));
    }

    #[test]
    fn experience_stores_dates_as_given() {
        let input = ExperienceInput {
            position: "Developer".into(),
            company: "Tech".into(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2022, 1, 1),
            description: "Work".into(),
            responsibilities: "Code".into(),
            ..Default::default()
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(valid.end_date, NaiveDate::from_ymd_opt(2022, 1, 1));
    }

    #[test]
    fn experience_requires_a_start_date() {
        let input = ExperienceInput {
            position: "Developer".into(),
            company: "Tech".into(),
            description: "Work".into(),
            responsibilities: "Code".into(),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(FormError::MissingField(field)) if field == "start_date"));
    }

    #[test]
    fn education_requires_a_start_year() {
        let input = EducationInput {
            degree: "BSc".into(),
            institution: "University".into(),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(FormError::MissingField(field)) if field == "start_year"));
    }
}
