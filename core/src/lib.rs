//! Synchronous client for the Grepper answers API.
//!
//! # Overview
//! Three operations over one authenticated REST API: search answers,
//! fetch an answer by id, update an answer's content. Each call is one
//! blocking HTTP round-trip; non-200 statuses become typed `ApiError`s.
//!
//! # Design
//! - `GrepperClient` holds only the API key, base URL and transport.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - The round-trip goes through the `Transport` trait; `UreqTransport` is
//!   the default, tests inject stubs.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{GrepperClient, DEFAULT_BASE_URL, DEFAULT_SIMILARITY};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Answer, SearchResponse};
