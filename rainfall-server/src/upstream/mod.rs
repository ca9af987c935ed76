//! Environment Agency flood-monitoring API client.
//!
//! The gateway talks to upstream through the [`UpstreamClient`] trait, which
//! hands back the raw status and body of a single GET. Interpreting the
//! response is the gateway's job, not the client's.

mod client;
mod error;
mod types;

pub use client::{EnvironmentClient, EnvironmentConfig, UpstreamClient, UpstreamResponse};
pub use error::UpstreamError;
pub use types::{ReadingItem, ReadingsResponse};
