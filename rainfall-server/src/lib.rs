//! Rainfall readings server.
//!
//! Proxies rainfall gauge readings from the Environment Agency
//! flood-monitoring API, caching each station's result for a few minutes.

pub mod cache;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod upstream;
pub mod web;
