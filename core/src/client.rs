//! Request builders, response parsers and the blocking facade for the
//! Grepper answers API.
//!
//! # Design
//! `GrepperClient` holds the API key, the base URL and a `Transport`, none of
//! which change after construction. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; both are pure. The facade methods (`search`,
//! `fetch_answer`, `update_answer`) glue the two together with exactly one
//! `Transport::execute` call and never retry.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Answer, SearchResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.grepper.com/v1";

/// Similarity sent by `search` when the caller does not pick one.
pub const DEFAULT_SIMILARITY: u32 = 60;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous client for the Grepper answers API.
#[derive(Clone)]
pub struct GrepperClient<T: Transport = UreqTransport> {
    api_key: String,
    base_url: String,
    transport: T,
}

impl GrepperClient<UreqTransport> {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self::with_transport(api_key, base_url, UreqTransport::new())
    }
}

impl<T: Transport> GrepperClient<T> {
    pub fn with_transport(api_key: &str, base_url: &str, transport: T) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- facade ------------------------------------------------------------

    /// Search answer titles for `query` at the default similarity.
    pub fn search(&self, query: &str) -> Result<Vec<Answer>, ApiError> {
        self.search_with_similarity(query, DEFAULT_SIMILARITY)
    }

    /// Search answer titles for `query`.
    ///
    /// `similarity` is documented by the service as 1 (loose) to 100
    /// (strict). It is forwarded as-is; the service rejects bad values.
    pub fn search_with_similarity(
        &self,
        query: &str,
        similarity: u32,
    ) -> Result<Vec<Answer>, ApiError> {
        let response = self.send(self.build_search(query, similarity))?;
        self.parse_search(response)
    }

    pub fn fetch_answer(&self, id: u64) -> Result<Answer, ApiError> {
        let response = self.send(self.build_fetch_answer(id))?;
        self.parse_fetch_answer(response)
    }

    /// Replace the content of answer `id`, returning the service's JSON reply
    /// untouched.
    pub fn update_answer(&self, id: u64, content: &str) -> Result<serde_json::Value, ApiError> {
        let response = self.send(self.build_update_answer(id, content))?;
        self.parse_update_answer(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", request.method.as_str(), request.path);
        let response = self.transport.execute(request)?;
        if response.status != 200 {
            warn!("grepper API responded with status {}", response.status);
        }
        Ok(response)
    }

    // -- builders ----------------------------------------------------------

    pub fn build_search(&self, query: &str, similarity: u32) -> HttpRequest {
        let params = form_urlencoded::Serializer::new(String::new())
            .append_pair("query", query)
            .append_pair("similarity", &similarity.to_string())
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/answers/search?{params}", self.base_url),
            headers: vec![self.authorization()],
            body: None,
        }
    }

    pub fn build_fetch_answer(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/answers/{id}", self.base_url),
            headers: vec![self.authorization()],
            body: None,
        }
    }

    pub fn build_update_answer(&self, id: u64, content: &str) -> HttpRequest {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("answer[content]", content)
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/answers/{id}", self.base_url),
            headers: vec![
                self.authorization(),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        }
    }

    /// Basic auth with the API key as username and an empty password.
    fn authorization(&self) -> (String, String) {
        let credentials = STANDARD.encode(format!("{}:", self.api_key));
        ("authorization".to_string(), format!("Basic {credentials}"))
    }

    // -- parsers -----------------------------------------------------------

    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Answer>, ApiError> {
        let envelope: SearchResponse = decode(response)?;
        Ok(envelope.data)
    }

    pub fn parse_fetch_answer(&self, response: HttpResponse) -> Result<Answer, ApiError> {
        decode(response)
    }

    pub fn parse_update_answer(
        &self,
        response: HttpResponse,
    ) -> Result<serde_json::Value, ApiError> {
        decode(response)
    }
}

impl<T: Transport> fmt::Debug for GrepperClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrepperClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Reject anything but 200, then decode the body as JSON.
fn decode<D: DeserializeOwned>(response: HttpResponse) -> Result<D, ApiError> {
    if response.status != 200 {
        return Err(ApiError::from_status(response.status, response.body));
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
