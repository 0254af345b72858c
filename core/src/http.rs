//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `GrepperClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a `Transport` performs the round-trip in between. Tests swap in
//! a stub transport, production code uses `UreqTransport`.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL including any query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Performs one HTTP round-trip.
///
/// Implementations must hand back non-2xx responses as `Ok(HttpResponse)`.
/// `Err` is reserved for failures where no complete response was received,
/// plus `DeserializationError` for a 2xx body that is not UTF-8.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Bound every request by `timeout`, end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport_err = |e: ureq::Error| ApiError::TransportError(e.to_string());

        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }
        .map_err(transport_err)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // No size cap: a search reply is whatever the service sends in one go.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(transport_err)?;
        let body = decode_body(status, bytes)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A success body must be UTF-8; an error body is only diagnostic text.
fn decode_body(status: u16, bytes: Vec<u8>) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        String::from_utf8(bytes).map_err(|e| ApiError::DeserializationError(e.to_string()))
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// Serve one canned `200 OK` with `body` on a random port; returns the URL.
    fn serve_once(body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}/v1/answers/search?query=x&similarity=60")
    }

    fn get(path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/".to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: None,
        };
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let transport = UreqTransport::with_timeout(Duration::from_secs(2));
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://127.0.0.1:1/v1/answers/1".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(req).unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
    }

    #[test]
    fn body_larger_than_ten_mib_is_read_in_full() {
        let padding = "a".repeat(11 * 1024 * 1024);
        let body = format!(r#"{{"data":[],"padding":"{padding}"}}"#);
        let url = serve_once(body.clone().into_bytes());

        let response = UreqTransport::new().execute(get(url)).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.len(), body.len());
        assert_eq!(response.body, body);
    }

    #[test]
    fn non_utf8_success_body_is_a_deserialization_error() {
        let url = serve_once(vec![b'{', 0xff, 0xfe, b'}']);
        let err = UreqTransport::new().execute(get(url)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn non_utf8_error_body_keeps_the_status() {
        let body = decode_body(503, vec![b'o', 0xff, b'k']).unwrap();
        assert_eq!(body, "o\u{fffd}k");
    }
}
