//! Web layer for the rainfall readings service.
//!
//! Validates requests, forwards them to the gateway, and renders outcomes
//! as JSON with the outcome's status code.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{ApiDoc, AppError, create_router};
pub use state::AppState;
