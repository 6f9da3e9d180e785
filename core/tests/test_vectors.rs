//! Verify build/parse methods against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated
//! responses, and expected parse results. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use opencat_core::{
    App, CreateApp, CreateEntitlement, CreateWebhook, Entitlement, Event, HttpMethod, HttpRequest,
    HttpResponse, OpenCatClient, WebhookEndpoint,
};

const BASE_URL: &str = "http://localhost:8080";
const API_KEY: &str = "test-key";

fn client() -> OpenCatClient {
    OpenCatClient::new(BASE_URL, API_KEY)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

/// Check method, full path, and the bearer header common to every request.
fn assert_envelope(req: &HttpRequest, expected: &serde_json::Value, name: &str) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );
    assert!(
        req.headers
            .contains(&("authorization".to_string(), format!("Bearer {API_KEY}"))),
        "{name}: bearer header"
    );
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

#[test]
fn create_app_test_vectors() {
    let raw = include_str!("../../test-vectors/create_app.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CreateApp = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_app(&input).unwrap();
        assert_envelope(&req, &case["expected_request"], name);
        let req_body: serde_json::Value =
            serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, case["expected_request"]["body"], "{name}: body");

        let app = c.parse_create_app(simulated(case)).unwrap();
        let expected: App = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(app, expected, "{name}: parsed result");
    }
}

#[test]
fn create_entitlement_test_vectors() {
    let raw = include_str!("../../test-vectors/create_entitlement.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let app_id = case["app_id"].as_str().unwrap();
        let input: CreateEntitlement = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_entitlement(app_id, &input).unwrap();
        assert_envelope(&req, &case["expected_request"], name);
        // Exact body equality also proves the description-omission rule.
        let req_body: serde_json::Value =
            serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, case["expected_request"]["body"], "{name}: body");

        let entitlement = c.parse_create_entitlement(simulated(case)).unwrap();
        let expected: Entitlement =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(entitlement, expected, "{name}: parsed result");
    }
}

#[test]
fn create_webhook_test_vectors() {
    let raw = include_str!("../../test-vectors/create_webhook.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CreateWebhook = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_webhook(&input).unwrap();
        assert_envelope(&req, &case["expected_request"], name);
        let req_body: serde_json::Value =
            serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, case["expected_request"]["body"], "{name}: body");

        let webhook = c.parse_create_webhook(simulated(case)).unwrap();
        let expected: WebhookEndpoint =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(webhook, expected, "{name}: parsed result");
    }
}

#[test]
fn list_events_test_vectors() {
    let raw = include_str!("../../test-vectors/list_events.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let cursor = case["input_cursor"].as_str();

        let req = c.build_list_events(cursor);
        assert_envelope(&req, &case["expected_request"], name);
        assert!(req.body.is_none(), "{name}: body should be None");

        let events = c.parse_list_events(simulated(case)).unwrap();
        let expected: Vec<Event> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(events, expected, "{name}: parsed result");
    }
}
