//! HTTP surface
//!
//! Dispatch registry, endpoint handlers and the response envelope.

pub mod dispatch;
pub mod routes;
pub mod services;
pub mod types;
