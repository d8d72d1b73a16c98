// ── Review domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{lenient_rating, lenient_text, lenient_timestamp};
use super::record_id::RecordId;
use super::Record;
use crate::error::CoreError;

/// A user review attached to a device through `mobile_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: RecordId,
    pub mobile_id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reviewer: String,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Review {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewDraft {
    pub reviewer: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=5).contains(&self.rating) {
            return Err(CoreError::ValidationFailed {
                message: format!("rating must be between 1 and 5, got {}", self.rating),
            });
        }
        if self.comment.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "review comment is required".into(),
            });
        }
        Ok(())
    }
}

/// Body of a `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub mobile_id: RecordId,
    pub reviewer: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl NewReview {
    pub fn from_draft(mobile_id: RecordId, draft: ReviewDraft, now: DateTime<Utc>) -> Self {
        Self {
            mobile_id,
            reviewer: draft.reviewer.trim().to_owned(),
            rating: draft.rating,
            comment: draft.comment.trim().to_owned(),
            created_at: now,
        }
    }
}
