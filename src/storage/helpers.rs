//! Shared storage helper functions.
//!
//! Column decoding shared by the SQL backends: kinds and ids are stored as
//! text, timestamps as RFC3339 strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::interfaces::{Result, StorageError};
use crate::model::EntryKind;

/// Parse a stored kind column back into an `EntryKind`.
pub fn parse_kind(s: &str) -> Result<EntryKind> {
    EntryKind::parse(s).ok_or_else(|| StorageError::UnknownKind(s.to_string()))
}

/// Parse a stored UUID column.
pub fn parse_uuid(s: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(s)?)
}

/// Parse a stored RFC3339 timestamp column.
pub fn parse_created_at(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidTimestamp(format!("{s}: {e}")))
}
