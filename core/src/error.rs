//! Error types for the OpenCat API client.
//!
//! # Design
//! Three failure classes stay distinct so callers can tell them apart:
//! `HttpError` means the server answered with a status ≥400 and carries the
//! status plus the raw body text verbatim (error bodies are never parsed as
//! JSON); `TransportError` means the exchange failed before any status was
//! received; `DeserializationError` means a 2xx body did not match the
//! expected shape — a client/server contract mismatch that must surface, not
//! be swallowed.

use std::fmt;

/// Errors returned by `OpenCatClient`.
#[derive(Debug)]
pub enum ApiError {
    /// The server responded with a status code ≥400. `body` is the raw
    /// response text, untouched.
    HttpError { status: u16, body: String },

    /// The request never completed: DNS, connect, TLS, or timeout failure,
    /// or the client was already closed.
    TransportError(String),

    /// A successful response body could not be deserialized into the
    /// expected type.
    DeserializationError(String),

    /// A request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::TransportError(msg) => {
                write!(f, "transport error: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
