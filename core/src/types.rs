//! Domain DTOs for the OpenCat v1 API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! of the mock-server crate; integration tests catch schema drift between the
//! two. Every record is an immutable value — equality and serialization are
//! field-wise, and each instance is rebuilt fresh from a response. IDs and
//! timestamps are opaque server-assigned strings (ISO-8601 passthrough),
//! never parsed on the client.

use serde::{Deserialize, Serialize};

/// A registered application on the OpenCat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub id: String,
    pub name: String,
    /// Store platform tag, e.g. `"ios"` or `"android"`.
    pub platform: String,
    pub bundle_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub store_credentials_encrypted: Option<String>,
}

/// A subscriber identified by the caller-supplied `app_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    pub id: String,
    pub app_id: String,
    pub app_user_id: String,
    pub created_at: String,
}

/// A named capability grantable to subscribers, independent of any purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entitlement {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A product mapped to a store catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub app_id: String,
    pub store_product_id: String,
    pub product_type: String,
    pub created_at: String,
}

/// A purchase/receipt record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub subscriber_id: String,
    pub product_id: String,
    pub store: String,
    pub store_transaction_id: String,
    pub purchase_date: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub raw_receipt: Option<String>,
}

/// A caller-registered URL the server pushes event notifications to,
/// authenticated with the shared `secret`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub id: String,
    pub app_id: String,
    pub url: String,
    pub secret: String,
    pub active: bool,
    pub created_at: String,
}

/// A domain event for polling/audit. `payload` is an opaque string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub subscriber_id: String,
    pub event_type: String,
    pub payload: String,
    pub created_at: String,
}

/// A subscriber's current activation state for one entitlement.
///
/// Denormalized view served under `active_entitlements`; deliberately a
/// distinct type from [`Entitlement`] — the server's contract relates the
/// two only by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitlementInfo {
    pub id: String,
    pub is_active: bool,
    pub product_id: String,
    pub store: String,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub will_renew: bool,
    #[serde(default)]
    pub purchase_date: Option<String>,
}

/// Composite returned by subscriber lookup. The entitlement and transaction
/// sections default to empty when the server omits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriberInfo {
    pub subscriber: Subscriber,
    #[serde(default)]
    pub active_entitlements: Vec<EntitlementInfo>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Request payload for registering a new app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApp {
    pub name: String,
    pub platform: String,
    pub bundle_id: String,
}

/// Request payload for creating a product under an app. `entitlement_ids`
/// names the entitlements the product grants when purchased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub store_product_id: String,
    pub product_type: String,
    pub entitlement_ids: Vec<String>,
}

/// Request payload for creating an entitlement. The `description` key is
/// omitted from the JSON entirely when `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntitlement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for submitting a store receipt for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub app_id: String,
    pub app_user_id: String,
    pub store: String,
    pub receipt_data: String,
    pub product_id: String,
}

/// Request payload for registering a webhook endpoint. The `secret` key is
/// omitted when `None`; the server then generates one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebhook {
    pub app_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}
