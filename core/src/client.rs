//! Request builder, response parser, and one-call operations for the
//! OpenCat v1 API.
//!
//! # Design
//! `OpenCatClient` keeps the build/parse split explicit: each operation has
//! a `build_*` method that produces an `HttpRequest` (bearer auth header
//! attached, bodies JSON-encoded) and a `parse_*` method that consumes an
//! `HttpResponse` (status ≥400 becomes `HttpError`, 2xx bodies decode into
//! records). Both halves are deterministic and testable without a network.
//! The plain operation methods (`create_app`, `list_apps`, ...) compose
//! build → [`Transport::execute`] → parse for callers that just want the
//! round trip done.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    App, CreateApp, CreateEntitlement, CreateProduct, CreateWebhook, Entitlement, Event, Product,
    SubmitReceipt, SubscriberInfo, Transaction, WebhookEndpoint,
};

/// Synchronous client for the OpenCat subscription backend.
///
/// Holds the server base URL (trailing slash stripped), the API key sent as
/// `authorization: Bearer <key>` on every request, and the pooled
/// [`Transport`]. Call [`close`](Self::close) when finished to release the
/// connection pool deterministically; dropping the client releases it too.
///
/// Not synchronized internally: share across threads only behind external
/// locking.
#[derive(Debug)]
pub struct OpenCatClient {
    base_url: String,
    api_key: String,
    transport: Transport,
}

impl OpenCatClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            transport: Transport::new(),
        }
    }

    /// Release the transport's connection pool. Idempotent; any operation
    /// after the first call fails with [`ApiError::TransportError`].
    pub fn close(&mut self) {
        self.transport.close();
    }

    // -- request building --

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: vec![(
                "authorization".to_string(),
                format!("Bearer {}", self.api_key),
            )],
            body: None,
        }
    }

    fn post<T: Serialize>(&self, path: String, payload: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path,
            headers: vec![
                (
                    "authorization".to_string(),
                    format!("Bearer {}", self.api_key),
                ),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn build_create_app(&self, input: &CreateApp) -> Result<HttpRequest, ApiError> {
        self.post(format!("{}/v1/apps", self.base_url), input)
    }

    pub fn build_list_apps(&self) -> HttpRequest {
        self.get(format!("{}/v1/apps", self.base_url))
    }

    pub fn build_get_subscriber(&self, app_user_id: &str) -> HttpRequest {
        self.get(format!("{}/v1/subscribers/{app_user_id}", self.base_url))
    }

    pub fn build_create_product(
        &self,
        app_id: &str,
        input: &CreateProduct,
    ) -> Result<HttpRequest, ApiError> {
        self.post(format!("{}/v1/apps/{app_id}/products", self.base_url), input)
    }

    pub fn build_list_products(&self, app_id: &str) -> HttpRequest {
        self.get(format!("{}/v1/apps/{app_id}/products", self.base_url))
    }

    pub fn build_create_entitlement(
        &self,
        app_id: &str,
        input: &CreateEntitlement,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            format!("{}/v1/apps/{app_id}/entitlements", self.base_url),
            input,
        )
    }

    pub fn build_list_entitlements(&self, app_id: &str) -> HttpRequest {
        self.get(format!("{}/v1/apps/{app_id}/entitlements", self.base_url))
    }

    pub fn build_submit_receipt(&self, input: &SubmitReceipt) -> Result<HttpRequest, ApiError> {
        self.post(format!("{}/v1/receipts", self.base_url), input)
    }

    pub fn build_create_webhook(&self, input: &CreateWebhook) -> Result<HttpRequest, ApiError> {
        self.post(format!("{}/v1/webhooks", self.base_url), input)
    }

    pub fn build_list_webhooks(&self) -> HttpRequest {
        self.get(format!("{}/v1/webhooks", self.base_url))
    }

    /// The cursor is opaque and server-defined; when present it is passed
    /// through verbatim as the `since` query parameter.
    pub fn build_list_events(&self, cursor: Option<&str>) -> HttpRequest {
        let path = match cursor {
            Some(cursor) => format!("{}/v1/events?since={cursor}", self.base_url),
            None => format!("{}/v1/events", self.base_url),
        };
        self.get(path)
    }

    // -- response parsing --

    pub fn parse_create_app(&self, response: HttpResponse) -> Result<App, ApiError> {
        decode(response)
    }

    pub fn parse_list_apps(&self, response: HttpResponse) -> Result<Vec<App>, ApiError> {
        decode(response)
    }

    pub fn parse_get_subscriber(&self, response: HttpResponse) -> Result<SubscriberInfo, ApiError> {
        decode(response)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        decode(response)
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        decode(response)
    }

    pub fn parse_create_entitlement(
        &self,
        response: HttpResponse,
    ) -> Result<Entitlement, ApiError> {
        decode(response)
    }

    pub fn parse_list_entitlements(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Entitlement>, ApiError> {
        decode(response)
    }

    pub fn parse_submit_receipt(&self, response: HttpResponse) -> Result<Transaction, ApiError> {
        decode(response)
    }

    pub fn parse_create_webhook(
        &self,
        response: HttpResponse,
    ) -> Result<WebhookEndpoint, ApiError> {
        decode(response)
    }

    pub fn parse_list_webhooks(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<WebhookEndpoint>, ApiError> {
        decode(response)
    }

    pub fn parse_list_events(&self, response: HttpResponse) -> Result<Vec<Event>, ApiError> {
        decode(response)
    }

    // -- one-call operations --

    pub fn create_app(&self, input: &CreateApp) -> Result<App, ApiError> {
        let request = self.build_create_app(input)?;
        self.parse_create_app(self.transport.execute(&request)?)
    }

    pub fn list_apps(&self) -> Result<Vec<App>, ApiError> {
        let request = self.build_list_apps();
        self.parse_list_apps(self.transport.execute(&request)?)
    }

    pub fn get_subscriber(&self, app_user_id: &str) -> Result<SubscriberInfo, ApiError> {
        let request = self.build_get_subscriber(app_user_id);
        self.parse_get_subscriber(self.transport.execute(&request)?)
    }

    pub fn create_product(
        &self,
        app_id: &str,
        input: &CreateProduct,
    ) -> Result<Product, ApiError> {
        let request = self.build_create_product(app_id, input)?;
        self.parse_create_product(self.transport.execute(&request)?)
    }

    pub fn list_products(&self, app_id: &str) -> Result<Vec<Product>, ApiError> {
        let request = self.build_list_products(app_id);
        self.parse_list_products(self.transport.execute(&request)?)
    }

    pub fn create_entitlement(
        &self,
        app_id: &str,
        input: &CreateEntitlement,
    ) -> Result<Entitlement, ApiError> {
        let request = self.build_create_entitlement(app_id, input)?;
        self.parse_create_entitlement(self.transport.execute(&request)?)
    }

    pub fn list_entitlements(&self, app_id: &str) -> Result<Vec<Entitlement>, ApiError> {
        let request = self.build_list_entitlements(app_id);
        self.parse_list_entitlements(self.transport.execute(&request)?)
    }

    pub fn submit_receipt(&self, input: &SubmitReceipt) -> Result<Transaction, ApiError> {
        let request = self.build_submit_receipt(input)?;
        self.parse_submit_receipt(self.transport.execute(&request)?)
    }

    pub fn create_webhook(&self, input: &CreateWebhook) -> Result<WebhookEndpoint, ApiError> {
        let request = self.build_create_webhook(input)?;
        self.parse_create_webhook(self.transport.execute(&request)?)
    }

    pub fn list_webhooks(&self) -> Result<Vec<WebhookEndpoint>, ApiError> {
        let request = self.build_list_webhooks();
        self.parse_list_webhooks(self.transport.execute(&request)?)
    }

    pub fn list_events(&self, cursor: Option<&str>) -> Result<Vec<Event>, ApiError> {
        let request = self.build_list_events(cursor);
        self.parse_list_events(self.transport.execute(&request)?)
    }
}

/// Reject any response with status ≥400, carrying the status and raw body
/// text verbatim. Everything below 400 — 204 included — passes through.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status >= 400 {
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
