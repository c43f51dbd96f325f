//! PrusaLink HTTP API model and client.
//!
//! Only the two read endpoints the notifier polls are covered:
//! `GET /api/v1/status` and `GET /api/v1/job`.

pub mod schema;
pub mod api;
pub mod client;

pub use schema::*;
pub use api::*;
pub use client::*;
