//! Normalised lookup results.
//!
//! An [`Outcome`] pairs a status code with either a [`ReadingSet`] or an
//! [`ErrorEnvelope`], never both. Success bodies only go with 2xx statuses
//! and error bodies only with everything else.

use super::ReadingSet;

/// Names the request property that caused a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub property_name: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
        }
    }
}

/// A failure message plus zero or more field-level details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub message: String,
    pub detail: Vec<ErrorDetail>,
}

impl ErrorEnvelope {
    /// An envelope with no field-level details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Vec::new(),
        }
    }

    /// Append a field-level detail.
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail.push(detail);
        self
    }
}

/// The payload carried by an [`Outcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeBody {
    Readings(ReadingSet),
    Error(ErrorEnvelope),
}

/// Result of a station lookup, as handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    status: u16,
    body: OutcomeBody,
}

impl Outcome {
    /// A 200 carrying readings.
    pub fn success(readings: ReadingSet) -> Self {
        Self {
            status: 200,
            body: OutcomeBody::Readings(readings),
        }
    }

    /// A failure with the given status.
    ///
    /// Only the gateway builds failures, always with a non-2xx `status`.
    pub(crate) fn failure(status: u16, error: ErrorEnvelope) -> Self {
        debug_assert!(
            !is_success_status(status),
            "failure outcome with success status {status}"
        );
        Self {
            status,
            body: OutcomeBody::Error(error),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    pub fn body(&self) -> &OutcomeBody {
        &self.body
    }

    /// The readings, if this is a success.
    pub fn data(&self) -> Option<&ReadingSet> {
        match &self.body {
            OutcomeBody::Readings(readings) => Some(readings),
            OutcomeBody::Error(_) => None,
        }
    }

    /// The error envelope, if this is a failure.
    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match &self.body {
            OutcomeBody::Readings(_) => None,
            OutcomeBody::Error(error) => Some(error),
        }
    }
}

/// Whether `status` is in the 2xx class.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
