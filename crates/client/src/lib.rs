//! Job API boundary.
//!
//! The export platform exposes jobs over an HTTP JSON API. This crate owns
//! that boundary: the [`ExportApi`] trait the engine is written against, the
//! `reqwest`-backed implementation, and the error taxonomy at the edge.

pub mod api;
pub mod error;
pub mod http;

pub use api::ExportApi;
pub use error::ApiError;
pub use http::{ApiConfig, HttpExportApi};
