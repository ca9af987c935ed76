//! Flood-monitoring API response DTOs.
//!
//! Only the fields this service uses are declared. Upstream also sends
//! `@id` and `measure` on each item; serde ignores them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Reading, ReadingSet};

/// Response from `GET /id/stations/{id}/readings`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingsResponse {
    /// Readings in upstream order. A missing `items` array is treated as empty.
    #[serde(default)]
    pub items: Vec<ReadingItem>,
}

/// One reading as upstream encodes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingItem {
    /// Measurement timestamp (ISO 8601).
    pub date_time: DateTime<Utc>,

    /// Rainfall in millimetres.
    pub value: f64,
}

impl From<ReadingItem> for Reading {
    fn from(item: ReadingItem) -> Self {
        Reading::new(item.date_time, item.value)
    }
}

impl From<ReadingsResponse> for ReadingSet {
    fn from(response: ReadingsResponse) -> Self {
        response.items.into_iter().map(Reading::from).collect()
    }
}
