//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ErrorDetail, ErrorEnvelope, Reading, ReadingSet};

/// Query parameters for the readings endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadingsQuery {
    /// Number of readings to return (defaults to 10)
    pub count: Option<u32>,
}

/// Successful readings response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RainfallReadingResponse {
    /// Readings in the order upstream returned them
    pub items: Vec<RainfallReading>,
}

/// A single reading.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RainfallReading {
    /// When the rainfall was measured
    pub date_time: DateTime<Utc>,

    /// Amount measured, in millimetres
    pub value: f64,
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// What went wrong
    pub message: String,

    /// Which request properties were at fault
    pub detail: Vec<ErrorDetailResult>,
}

/// A property-level error.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetailResult {
    pub property_name: String,
    pub message: String,
}

// Conversion implementations

impl From<&Reading> for RainfallReading {
    fn from(reading: &Reading) -> Self {
        Self {
            date_time: reading.date_time,
            value: reading.value,
        }
    }
}

impl From<&ReadingSet> for RainfallReadingResponse {
    fn from(readings: &ReadingSet) -> Self {
        Self {
            items: readings.items().iter().map(RainfallReading::from).collect(),
        }
    }
}

impl From<&ErrorDetail> for ErrorDetailResult {
    fn from(detail: &ErrorDetail) -> Self {
        Self {
            property_name: detail.property_name.clone(),
            message: detail.message.clone(),
        }
    }
}

impl From<&ErrorEnvelope> for ErrorResponse {
    fn from(envelope: &ErrorEnvelope) -> Self {
        Self {
            message: envelope.message.clone(),
            detail: envelope.detail.iter().map(ErrorDetailResult::from).collect(),
        }
    }
}
