//! Synchronous client for the OpenCat subscription/entitlement backend.
//!
//! # Overview
//! Marshals typed requests to the OpenCat v1 HTTP API and unmarshals typed
//! responses. No business logic, no persistence, no retries, no caching —
//! one method call is one authenticated round trip.
//!
//! # Design
//! - `OpenCatClient` holds the base URL, the bearer API key, and a pooled
//!   blocking [`Transport`]; `close` releases the pool deterministically.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), with a one-call method composing
//!   the two around the transport. The build/parse halves never touch the
//!   network, keeping the wire contract testable offline.
//! - Records are immutable values with field-wise serde mapping; timestamps
//!   and IDs are opaque strings. DTOs are defined independently from the
//!   mock-server crate; integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::OpenCatClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
pub use types::{
    App, CreateApp, CreateEntitlement, CreateProduct, CreateWebhook, Entitlement, EntitlementInfo,
    Event, Product, SubmitReceipt, Subscriber, SubscriberInfo, Transaction, WebhookEndpoint,
};
