//! Domain types for the rainfall readings service.
//!
//! These types are independent of both the upstream wire format and the
//! JSON served to clients.

mod outcome;
mod reading;
mod station;

pub use outcome::{ErrorDetail, ErrorEnvelope, Outcome, OutcomeBody, is_success_status};
pub use reading::{Reading, ReadingSet};
pub use station::{InvalidStationId, ReadingCountLimit, StationId};
