use std::fmt;
use std::str::FromStr;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};

use crate::schema::skills;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Tools,
}

impl SkillCategory {
    pub const CHOICES: &'static [(&'static str, &'static str)] = &[
        ("frontend", "Frontend"),
        ("backend", "Backend"),
        ("database", "Database"),
        ("tools", "Tools & Others"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Tools => "tools",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::Tools => "Tools & Others",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontend" => Ok(SkillCategory::Frontend),
            "backend" => Ok(SkillCategory::Backend),
            "database" => Ok(SkillCategory::Database),
            "tools" => Ok(SkillCategory::Tools),
            other => Err(format!("unknown skill category '{}'", other)),
        }
    }
}

impl ToSql<Text, Sqlite> for SkillCategory {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for SkillCategory {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = skills, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Skill {
    pub id: i32,
    pub name: String,
    /// Proficiency, 0-100 by convention only.
    pub percentage: i32,
    pub category: SkillCategory,
    pub display_order: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = skills)]
pub struct NewSkill<'a> {
    pub name: &'a str,
    pub percentage: i32,
    pub category: SkillCategory,
    pub display_order: i32,
}

impl Skill {
    /// Ordered by display order, then category.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Skill>> {
        skills::table
            .order((skills::display_order.asc(), skills::category.asc()))
            .select(Skill::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new_skill: &NewSkill) -> QueryResult<usize> {
        diesel::insert_into(skills::table).values(new_skill).execute(conn)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}%", self.name, self.percentage)
    }
}

#[cfg(test)]
mod test {
    use super::SkillCategory;

    #[test]
    fn categories_round_trip_through_their_storage_names() {
        for (value, _) in SkillCategory::CHOICES {
            let parsed: SkillCategory = value.parse().unwrap();
            assert_eq!(parsed.as_str(), *value);
        }
        assert!("devops".parse::<SkillCategory>().is_err());
    }
}
