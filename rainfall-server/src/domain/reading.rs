//! Rainfall reading types.

use chrono::{DateTime, Utc};

/// A single rainfall measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// When the rainfall was measured.
    pub date_time: DateTime<Utc>,

    /// Amount of rainfall measured, in millimetres.
    pub value: f64,
}

impl Reading {
    pub fn new(date_time: DateTime<Utc>, value: f64) -> Self {
        Self { date_time, value }
    }
}

/// Readings for one station, in the order upstream returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadingSet {
    items: Vec<Reading>,
}

impl ReadingSet {
    pub fn new(items: Vec<Reading>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Reading] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Reading> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
