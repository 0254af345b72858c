//! Domain DTOs for the Grepper answers API.
//!
//! # Design
//! These types mirror the service's JSON schema field for field. The mock
//! server defines its own copy; integration tests catch any drift between
//! the two crates.

use serde::{Deserialize, Serialize};

/// A single answer returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub id: u64,
    pub content: String,
    pub author_name: String,
    pub author_profile_url: String,
    pub title: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

/// Envelope of `GET /answers/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<Answer>,
}
