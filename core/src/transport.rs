//! Blocking HTTP executor backed by ureq.
//!
//! # Design
//! `Transport` owns a `ureq::Agent` configured once at construction: a fixed
//! 30-second global timeout on every call, and status-as-error disabled so
//! 4xx/5xx responses come back as plain `HttpResponse` data — interpreting
//! the status code belongs to the client's parse layer, not the transport.
//!
//! The agent lives in an `Option` so `close` can release the connection pool
//! exactly once. `close` is idempotent; executing a request after closing is
//! a `TransportError`. Dropping the transport releases the pool implicitly,
//! so connections are freed on every exit path.

use std::time::Duration;

use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Timeout applied to every request, connection included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Synchronous HTTP executor with a pooled connection agent.
#[derive(Debug)]
pub struct Transport {
    agent: Option<Agent>,
}

impl Transport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent: Some(agent) }
    }

    /// Execute one HTTP round trip.
    ///
    /// Transport failures (DNS, connect, TLS, timeout) and use after `close`
    /// map to [`ApiError::TransportError`]. Any status the server actually
    /// returned — including 4xx/5xx — is reported as a successful
    /// `HttpResponse` for the caller to interpret.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self
            .agent
            .as_ref()
            .ok_or_else(|| ApiError::TransportError("client is closed".to_string()))?;

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = agent.get(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }

    /// Release the connection pool. Safe to call more than once; requests
    /// after the first call fail with [`ApiError::TransportError`].
    pub fn close(&mut self) {
        self.agent = None;
    }

    pub fn is_closed(&self) -> bool {
        self.agent.is_none()
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
