//! Contact record model.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ids::RecordId;

/// One contact record as the server stores it.
///
/// `name` is the roster key: deletion and server-side matching go through
/// it. The client submits records verbatim and leaves uniqueness and
/// non-emptiness checks to the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Display name, unique within the roster at submission time.
    pub name: String,
    /// Free-text description the agent consults.
    pub description: String,
    /// Contact email address.
    pub email: String,
}

impl ContactRecord {
    /// An all-empty record, as appended by the blank-row operation.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.email.is_empty()
    }
}

/// Editable field of a [`ContactRecord`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    /// The `name` field.
    Name,
    /// The `description` field.
    Description,
    /// The `email` field.
    Email,
}

impl ContactField {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Email => "email",
        }
    }

    /// Write `value` into this field of `record`.
    pub fn apply(self, record: &mut ContactRecord, value: String) {
        match self {
            Self::Name => record.name = value,
            Self::Description => record.description = value,
            Self::Email => record.email = value,
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "email" => Ok(Self::Email),
            _ => Err(value.to_string()),
        }
    }
}

/// One row of the edit buffer: a working-copy record plus a local identity
/// that survives re-indexing. The identity is never serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRow {
    /// Stable local identity of this row.
    pub id: RecordId,
    /// The working copy of the record.
    pub record: ContactRecord,
}

impl EditRow {
    /// Wrap a record in a fresh row identity.
    #[must_use]
    pub fn seeded(record: ContactRecord) -> Self {
        Self {
            id: RecordId::new(),
            record,
        }
    }

    /// A blank row, as appended by the add operation.
    #[must_use]
    pub fn blank() -> Self {
        Self::seeded(ContactRecord::blank())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_record() {
        let record = ContactRecord::blank();
        assert!(record.is_blank());
    }

    #[test]
    fn test_field_apply() {
        let mut record = ContactRecord::blank();
        ContactField::Name.apply(&mut record, "Alice".to_string());
        ContactField::Email.apply(&mut record, "alice@example.com".to_string());
        assert_eq!(record.name, "Alice");
        assert_eq!(record.email, "alice@example.com");
        assert!(!record.is_blank());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("email".parse::<ContactField>().unwrap(), ContactField::Email);
        assert!("phone".parse::<ContactField>().is_err());
    }

    #[test]
    fn test_record_serde_shape() {
        let record = ContactRecord {
            name: "Bob".to_string(),
            description: "qa".to_string(),
            email: "bob@example.com".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Bob",
                "description": "qa",
                "email": "bob@example.com"
            })
        );
    }

    #[test]
    fn test_rows_have_distinct_ids() {
        assert_ne!(EditRow::blank().id, EditRow::blank().id);
    }
}
