//! Identifier newtypes for both sides of a mapping.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Maximum post type name length accepted by the host CMS.
pub const POST_TYPE_MAX_LEN: usize = 20;

/// Numeric identifier of a CRM entity type (activity type value, case type
/// id, contact type id, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityTypeId(pub i64);

impl EntityTypeId {
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityTypeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for EntityTypeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| CoreError::Validation(format!("invalid entity type id '{s}': {e}")))
    }
}

/// Name of a CMS post type (e.g. `student`, `event_listing`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PostType(String);

impl PostType {
    /// Parse a post type name, enforcing the host CMS key rules: 1 to 20
    /// characters of lowercase ASCII letters, digits, `_` or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the name is empty, too long, or
    /// contains a character outside the allowed set.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::Validation("post type name is empty".into()));
        }
        if raw.len() > POST_TYPE_MAX_LEN {
            return Err(CoreError::Validation(format!(
                "post type '{raw}' exceeds {POST_TYPE_MAX_LEN} characters"
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-')))
        {
            return Err(CoreError::Validation(format!(
                "post type '{raw}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PostType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PostType {
    fn from(value: String) -> Self {
        Self(value)
    }
}
