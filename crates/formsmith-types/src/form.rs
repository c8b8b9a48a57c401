//! Form, version-ledger, and response records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::bundle::FormBundle;

/// Unique identifier for a form, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub Uuid);

impl FormId {
    /// Create a new FormId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a FormId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FormId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a version-ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionId(pub Uuid);

impl VersionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for VersionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a submitted form response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub Uuid);

impl ResponseId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResponseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A form owned by a user.
///
/// Holds the *current* bundle plus a version counter that always equals the
/// length of the form's version ledger. The engine produces the value that
/// becomes the new current bundle; persistence ordering is owned by the
/// service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    /// Caller identity supplied by the auth layer.
    pub owner_id: String,
    pub title: String,
    /// The current schema bundle.
    pub bundle: FormBundle,
    /// Monotonically incrementing counter; 1 at creation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable entry in a form's version ledger.
///
/// Entries are created by successful generate/refine calls, never mutated or
/// deleted. `seq` forms a strictly increasing, gap-free chain per form,
/// starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormVersion {
    pub id: VersionId,
    pub form_id: FormId,
    pub seq: i64,
    /// Snapshot of the bundle as of this version.
    pub bundle: FormBundle,
    /// The prompt or instruction that produced this version.
    pub change_prompt: String,
    pub created_at: DateTime<Utc>,
}

/// A submitted response to a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: ResponseId,
    pub form_id: FormId,
    /// Raw submitted data keyed by field name. Stored as-is; the engine does
    /// not interpret response content.
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A form in a listing, with its response count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormListEntry {
    #[serde(flatten)]
    pub form: Form,
    pub response_count: i64,
}

/// Request to generate a new form from a natural-language prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFormRequest {
    pub prompt: String,
    pub title: Option<String>,
}

/// Request to refine an existing form with a natural-language instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineFormRequest {
    pub instruction: String,
}

/// Request to rename a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}

/// Request to submit a response to a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponseRequest {
    pub data: serde_json::Value,
}
