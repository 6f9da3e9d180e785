//! In-memory mock of the OpenCat v1 API.
//!
//! Serves the endpoint surface the client crate speaks: apps, entitlements,
//! products, subscribers, receipts, webhooks, and events, all behind bearer
//! authentication. State is a plain in-memory store; a logical clock issues
//! strictly increasing timestamp strings so the `since` event cursor is
//! deterministic to test against.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub bundle_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub store_credentials_encrypted: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: String,
    pub app_id: String,
    pub app_user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub created_at: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub app_id: String,
    pub store_product_id: String,
    pub product_type: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    pub expiration_date: Option<String>,
    pub raw_receipt: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub id: String,
    pub app_id: String,
    pub url: String,
    pub secret: String,
    pub active: bool,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub subscriber_id: String,
    pub event_type: String,
    pub payload: String,
    pub created_at: String,
}

/// Denormalized activation state served under `active_entitlements`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntitlementInfo {
    pub id: String,
    pub is_active: bool,
    pub product_id: String,
    pub store: String,
    pub expiration_date: Option<String>,
    pub will_renew: bool,
    pub purchase_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriberInfo {
    pub subscriber: Subscriber,
    pub active_entitlements: Vec<EntitlementInfo>,
    pub transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
pub struct CreateApp {
    pub name: String,
    pub platform: String,
    pub bundle_id: String,
}

#[derive(Deserialize)]
pub struct CreateEntitlement {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub store_product_id: String,
    pub product_type: String,
    #[serde(default)]
    pub entitlement_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct SubmitReceipt {
    pub app_id: String,
    pub app_user_id: String,
    pub store: String,
    pub receipt_data: String,
    pub product_id: String,
}

#[derive(Deserialize)]
pub struct CreateWebhook {
    pub app_id: String,
    pub url: String,
    pub secret: Option<String>,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub since: Option<String>,
}

/// Everything lives in insertion-ordered `Vec`s so list endpoints return
/// stable ordering.
#[derive(Default)]
pub struct Store {
    apps: Vec<App>,
    subscribers: Vec<Subscriber>,
    entitlements: Vec<Entitlement>,
    products: Vec<Product>,
    /// (product_id, entitlement_id) grants.
    product_entitlements: Vec<(String, String)>,
    transactions: Vec<Transaction>,
    webhooks: Vec<WebhookEndpoint>,
    events: Vec<Event>,
    clock: u64,
}

impl Store {
    /// Strictly increasing ISO-8601 timestamps; the fractional seconds carry
    /// the logical clock so lexicographic order matches issue order.
    fn tick(&mut self) -> String {
        self.clock += 1;
        format!("2024-01-01T00:00:00.{:06}Z", self.clock)
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct ApiState {
    db: Db,
    expected_auth: Arc<String>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn app(api_key: &str) -> Router {
    let state = ApiState {
        db: Arc::new(RwLock::new(Store::default())),
        expected_auth: Arc::new(format!("Bearer {api_key}")),
    };
    Router::new()
        .route("/v1/apps", post(create_app).get(list_apps))
        .route(
            "/v1/apps/{app_id}/entitlements",
            post(create_entitlement).get(list_entitlements),
        )
        .route(
            "/v1/apps/{app_id}/products",
            post(create_product).get(list_products),
        )
        .route("/v1/subscribers/{app_user_id}", get(get_subscriber))
        .route("/v1/receipts", post(submit_receipt))
        .route("/v1/webhooks", post(create_webhook).get(list_webhooks))
        .route("/v1/events", get(list_events))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_bearer(State(state): State<ApiState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == state.expected_auth.as_str());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

async fn create_app(
    State(state): State<ApiState>,
    Json(input): Json<CreateApp>,
) -> (StatusCode, Json<App>) {
    let mut db = state.db.write().await;
    let now = db.tick();
    let app = App {
        id: new_id(),
        name: input.name,
        platform: input.platform,
        bundle_id: input.bundle_id,
        created_at: now.clone(),
        updated_at: now,
        store_credentials_encrypted: None,
    };
    db.apps.push(app.clone());
    (StatusCode::CREATED, Json(app))
}

async fn list_apps(State(state): State<ApiState>) -> Json<Vec<App>> {
    Json(state.db.read().await.apps.clone())
}

async fn create_entitlement(
    State(state): State<ApiState>,
    Path(app_id): Path<String>,
    Json(input): Json<CreateEntitlement>,
) -> Result<(StatusCode, Json<Entitlement>), (StatusCode, String)> {
    let mut db = state.db.write().await;
    if !db.apps.iter().any(|a| a.id == app_id) {
        return Err((StatusCode::NOT_FOUND, "App not found".to_string()));
    }
    let created_at = db.tick();
    let entitlement = Entitlement {
        id: new_id(),
        app_id,
        name: input.name,
        created_at,
        description: input.description,
    };
    db.entitlements.push(entitlement.clone());
    Ok((StatusCode::CREATED, Json(entitlement)))
}

async fn list_entitlements(
    State(state): State<ApiState>,
    Path(app_id): Path<String>,
) -> Json<Vec<Entitlement>> {
    let db = state.db.read().await;
    Json(
        db.entitlements
            .iter()
            .filter(|e| e.app_id == app_id)
            .cloned()
            .collect(),
    )
}

async fn create_product(
    State(state): State<ApiState>,
    Path(app_id): Path<String>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, String)> {
    let mut db = state.db.write().await;
    if !db.apps.iter().any(|a| a.id == app_id) {
        return Err((StatusCode::NOT_FOUND, "App not found".to_string()));
    }
    let created_at = db.tick();
    let product = Product {
        id: new_id(),
        app_id,
        store_product_id: input.store_product_id,
        product_type: input.product_type,
        created_at,
    };
    for entitlement_id in input.entitlement_ids {
        db.product_entitlements
            .push((product.id.clone(), entitlement_id));
    }
    db.products.push(product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(
    State(state): State<ApiState>,
    Path(app_id): Path<String>,
) -> Json<Vec<Product>> {
    let db = state.db.read().await;
    Json(
        db.products
            .iter()
            .filter(|p| p.app_id == app_id)
            .cloned()
            .collect(),
    )
}

async fn get_subscriber(
    State(state): State<ApiState>,
    Path(app_user_id): Path<String>,
) -> Result<Json<SubscriberInfo>, (StatusCode, String)> {
    let db = state.db.read().await;
    let subscriber = db
        .subscribers
        .iter()
        .find(|s| s.app_user_id == app_user_id)
        .cloned()
        .ok_or((StatusCode::NOT_FOUND, "Subscriber not found".to_string()))?;

    let transactions: Vec<Transaction> = db
        .transactions
        .iter()
        .filter(|t| t.subscriber_id == subscriber.id)
        .cloned()
        .collect();

    let mut active_entitlements: Vec<EntitlementInfo> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.status == "active") {
        for (product_id, entitlement_id) in db
            .product_entitlements
            .iter()
            .filter(|(product_id, _)| *product_id == transaction.product_id)
        {
            if active_entitlements.iter().any(|e| e.id == *entitlement_id) {
                continue;
            }
            active_entitlements.push(EntitlementInfo {
                id: entitlement_id.clone(),
                is_active: true,
                product_id: product_id.clone(),
                store: transaction.store.clone(),
                expiration_date: transaction.expiration_date.clone(),
                will_renew: false,
                purchase_date: Some(transaction.purchase_date.clone()),
            });
        }
    }

    Ok(Json(SubscriberInfo {
        subscriber,
        active_entitlements,
        transactions,
    }))
}

async fn submit_receipt(
    State(state): State<ApiState>,
    Json(input): Json<SubmitReceipt>,
) -> Result<(StatusCode, Json<Transaction>), (StatusCode, String)> {
    let mut db = state.db.write().await;
    if !db.apps.iter().any(|a| a.id == input.app_id) {
        return Err((StatusCode::NOT_FOUND, "App not found".to_string()));
    }
    if !db
        .products
        .iter()
        .any(|p| p.id == input.product_id && p.app_id == input.app_id)
    {
        return Err((StatusCode::NOT_FOUND, "Product not found".to_string()));
    }

    let existing = db
        .subscribers
        .iter()
        .find(|s| s.app_id == input.app_id && s.app_user_id == input.app_user_id)
        .cloned();
    let subscriber = match existing {
        Some(subscriber) => subscriber,
        None => {
            let created_at = db.tick();
            let subscriber = Subscriber {
                id: new_id(),
                app_id: input.app_id.clone(),
                app_user_id: input.app_user_id.clone(),
                created_at,
            };
            db.subscribers.push(subscriber.clone());
            subscriber
        }
    };

    let now = db.tick();
    let transaction = Transaction {
        id: new_id(),
        subscriber_id: subscriber.id.clone(),
        product_id: input.product_id.clone(),
        store: input.store,
        store_transaction_id: new_id(),
        purchase_date: now.clone(),
        status: "active".to_string(),
        created_at: now.clone(),
        updated_at: now,
        expiration_date: None,
        raw_receipt: Some(input.receipt_data),
    };
    db.transactions.push(transaction.clone());

    let created_at = db.tick();
    let payload = serde_json::json!({
        "transaction_id": transaction.id,
        "product_id": transaction.product_id,
    })
    .to_string();
    db.events.push(Event {
        id: new_id(),
        subscriber_id: subscriber.id,
        event_type: "initial_purchase".to_string(),
        payload,
        created_at,
    });

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn create_webhook(
    State(state): State<ApiState>,
    Json(input): Json<CreateWebhook>,
) -> (StatusCode, Json<WebhookEndpoint>) {
    let mut db = state.db.write().await;
    let created_at = db.tick();
    let webhook = WebhookEndpoint {
        id: new_id(),
        app_id: input.app_id,
        url: input.url,
        secret: input.secret.unwrap_or_else(new_id),
        active: true,
        created_at,
    };
    db.webhooks.push(webhook.clone());
    (StatusCode::CREATED, Json(webhook))
}

async fn list_webhooks(State(state): State<ApiState>) -> Json<Vec<WebhookEndpoint>> {
    Json(state.db.read().await.webhooks.clone())
}

/// `since` is an exclusive `created_at` watermark; matching events come back
/// oldest first.
async fn list_events(
    State(state): State<ApiState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<Event>> {
    let db = state.db.read().await;
    let events = match &query.since {
        Some(since) => db
            .events
            .iter()
            .filter(|e| e.created_at.as_str() > since.as_str())
            .cloned()
            .collect(),
        None => db.events.clone(),
    };
    Json(events)
}
