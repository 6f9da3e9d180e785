//! HTTP request/response values as plain data.
//!
//! # Design
//! The client builds `HttpRequest` values and parses `HttpResponse` values;
//! the [`Transport`](crate::transport::Transport) (or any caller-supplied
//! executor) performs the actual I/O in between. Keeping the boundary as
//! plain data makes request construction and response interpretation fully
//! deterministic and testable without a network.
//!
//! All fields use owned types (`String`, `Vec`) so values move freely across
//! the I/O boundary without lifetime concerns.

/// HTTP method for a request. The v1 API surface only ever reads and
/// creates, so only `GET` and `POST` exist here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `path` carries the full URL including any query string. Built by
/// `OpenCatClient::build_*` methods; executed by a transport which returns
/// the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `OpenCatClient::parse_*` methods for status interpretation and
/// deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
