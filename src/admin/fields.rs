use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A single column value as the admin sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Value as submitted in forms and query strings. Null is empty.
    pub fn raw(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    /// Case-insensitive substring match; `needle` must already be lowercase.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            FieldValue::Null => false,
            other => other.raw().to_lowercase().contains(needle),
        }
    }

    /// Nulls sort first; mismatched kinds fall back to their raw text.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (a, b) => a.raw().cmp(&b.raw()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("-"),
            FieldValue::Bool(true) => f.write_str("Yes"),
            FieldValue::Bool(false) => f.write_str("No"),
            other => f.write_str(&other.raw()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.into())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Anything the change list can read columns from by name.
pub trait Fields {
    /// Unknown names yield `FieldValue::Null`.
    fn field(&self, name: &str) -> FieldValue;
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use chrono::NaiveDate;

    use super::FieldValue;

    #[test]
    fn it_renders_display_and_raw_forms() {
        assert_eq!(FieldValue::Bool(true).to_string(), "Yes");
        assert_eq!(FieldValue::Bool(true).raw(), "true");
        assert_eq!(FieldValue::Null.to_string(), "-");
        assert_eq!(FieldValue::Null.raw(), "");
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(FieldValue::from(date).raw(), "2023-01-01");
        assert_eq!(FieldValue::from(date.and_hms_opt(9, 5, 0).unwrap()).raw(), "2023-01-01 09:05:00");
    }

    #[test]
    fn it_searches_case_insensitively() {
        assert!(FieldValue::from("Django Best Practices").contains("django"));
        assert!(!FieldValue::Null.contains(""));
    }

    #[test]
    fn nulls_sort_first() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Int(0)), Ordering::Less);
        assert_eq!(FieldValue::from(Some(2020)).compare(&FieldValue::from(None::<i32>)), Ordering::Greater);
        assert_eq!(FieldValue::from("apple").compare(&FieldValue::from("Banana")), Ordering::Less);
    }
}
