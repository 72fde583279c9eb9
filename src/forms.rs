//! Helpers for HTML form bodies: checkbox fields are absent when unchecked and
//! optional inputs arrive as empty strings.

use crate::errors::FormError;

/// `#[serde(default, deserialize_with = "forms::checkbox::deserialize")]`
pub mod checkbox {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(matches!(
            raw.as_deref().map(str::trim),
            Some("on") | Some("true") | Some("1") | Some("yes")
        ))
    }
}

/// `#[serde(default, deserialize_with = "forms::optional::deserialize")]`
/// Blank input becomes `None`; anything else goes through `FromStr`.
pub mod optional {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }
}

pub fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingField(field.into()))
    } else {
        Ok(trimmed)
    }
}

pub fn required_value<T>(value: Option<T>, field: &str) -> Result<T, FormError> {
    value.ok_or_else(|| FormError::MissingField(field.into()))
}

/// Blank text becomes `None` for nullable text columns.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
