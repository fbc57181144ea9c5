//! Waitlist records exchanged with the data collaborator.

use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

/// Collaborator-assigned identifier of a waitlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single outgoing payload of a signup.
///
/// Both fields are trimmed and non-empty; no format validation is applied to the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    pub name: NonEmptyString,
    pub email: NonEmptyString,
}

/// A persisted signup, owned by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    pub name: String,
    pub email: String,
    /// Milliseconds since the Unix epoch of the latest signup for this email.
    #[serde(rename = "createdAt", deserialize_with = "millis_from_number")]
    pub created_at: i64,
}

// The backend stores timestamps as JSON numbers, which may arrive as floats.
fn millis_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as i64)
}
