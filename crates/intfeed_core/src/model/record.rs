//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical record returned by list/create use-cases.
//! - Validate raw `name`/`age` input before it reaches the store.
//!
//! # Invariants
//! - `id` is assigned by the store and increases with creation order.
//! - `name` is never blank.
//! - Input text is coerced, not sanitized: a valid `name` is stored as given.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier; ascending order equals creation order.
pub type RecordId = i64;

/// Persisted name/age entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Equal to `created_at` for every record.
    pub updated_at: i64,
}

/// Validated input for the create use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub age: i64,
}

/// Field-level validation failure for record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingName,
    BlankName,
    /// Name contains `\0`, which SQLite text functions treat as end of string.
    NulInName,
    MissingAge,
    /// Raw `age` text that failed integer parsing.
    InvalidAge(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "name is required"),
            Self::BlankName => write!(f, "name cannot be empty"),
            Self::NulInName => write!(f, "name cannot contain NUL characters"),
            Self::MissingAge => write!(f, "age is required"),
            Self::InvalidAge(raw) => write!(f, "age must be an integer, got `{raw}`"),
        }
    }
}

impl Error for RecordValidationError {}

impl NewRecord {
    /// Builds a record input from already-typed values.
    ///
    /// # Errors
    /// - Returns `BlankName` when `name` is empty or whitespace-only.
    /// - Returns `NulInName` when `name` contains `\0`.
    pub fn new(name: impl Into<String>, age: i64) -> Result<Self, RecordValidationError> {
        let record = Self {
            name: name.into(),
            age,
        };
        record.validate()?;
        Ok(record)
    }

    /// Parses raw adapter input (form fields, JSON values rendered as text).
    ///
    /// `age` accepts a base-10 integer with optional sign and surrounding
    /// whitespace. Fractional or non-numeric text is rejected.
    pub fn parse(name: Option<&str>, age: Option<&str>) -> Result<Self, RecordValidationError> {
        let name = name.ok_or(RecordValidationError::MissingName)?;
        let age = parse_age(age)?;
        Self::new(name, age)
    }

    /// Checks invariants that must hold before persistence.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::BlankName);
        }
        if self.name.contains('\0') {
            return Err(RecordValidationError::NulInName);
        }
        Ok(())
    }
}

fn parse_age(raw: Option<&str>) -> Result<i64, RecordValidationError> {
    let raw = raw.ok_or(RecordValidationError::MissingAge)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::MissingAge);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| RecordValidationError::InvalidAge(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{NewRecord, Record, RecordValidationError};

    #[test]
    fn parse_accepts_padded_integer_age() {
        let record = NewRecord::parse(Some("Ann"), Some(" 30 ")).unwrap();
        assert_eq!(record.name, "Ann");
        assert_eq!(record.age, 30);
    }

    #[test]
    fn parse_keeps_name_verbatim() {
        let record = NewRecord::parse(Some("  Ann "), Some("-1")).unwrap();
        assert_eq!(record.name, "  Ann ");
        assert_eq!(record.age, -1);
    }

    #[test]
    fn parse_reports_missing_fields() {
        assert_eq!(
            NewRecord::parse(None, Some("30")).unwrap_err(),
            RecordValidationError::MissingName
        );
        assert_eq!(
            NewRecord::parse(Some("Ann"), None).unwrap_err(),
            RecordValidationError::MissingAge
        );
        assert_eq!(
            NewRecord::parse(Some("Ann"), Some("  ")).unwrap_err(),
            RecordValidationError::MissingAge
        );
    }

    #[test]
    fn parse_rejects_blank_name_and_non_integer_age() {
        assert_eq!(
            NewRecord::parse(Some(" \t"), Some("30")).unwrap_err(),
            RecordValidationError::BlankName
        );
        assert_eq!(
            NewRecord::parse(Some("Ann"), Some("30.5")).unwrap_err(),
            RecordValidationError::InvalidAge("30.5".to_string())
        );
        assert!(matches!(
            NewRecord::parse(Some("Ann"), Some("thirty")),
            Err(RecordValidationError::InvalidAge(_))
        ));
    }

    #[test]
    fn parse_rejects_nul_anywhere_in_name() {
        assert_eq!(
            NewRecord::parse(Some("\0Ann"), Some("30")).unwrap_err(),
            RecordValidationError::NulInName
        );
        assert_eq!(
            NewRecord::new("An\0n", 30).unwrap_err(),
            RecordValidationError::NulInName
        );
    }

    #[test]
    fn record_serializes_with_camel_case_timestamps() {
        let record = Record {
            id: 7,
            name: "Ann".to_string(),
            age: 30,
            created_at: 1_000,
            updated_at: 1_000,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["createdAt"], 1_000);
        assert_eq!(value["updatedAt"], 1_000);
        assert!(value.get("created_at").is_none());
    }
}
