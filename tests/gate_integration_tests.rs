use portfolio_api::{
    AppConfig, AppState, create_router,
    gate::{Allowlist, ApiKeyGate},
    repository::{InMemoryRepository, RepositoryState},
    storage::{ImageState, InMemoryImageStore},
};
use std::sync::Arc;
use tokio::net::TcpListener;

const API_KEY: &str = "test-api-key";

async fn spawn_app() -> String {
    let config = AppConfig::default();
    let state = AppState {
        repo: Arc::new(InMemoryRepository::new()) as RepositoryState,
        images: Arc::new(InMemoryImageStore::new()) as ImageState,
        gate: Arc::new(ApiKeyGate::new(config.api_key.clone())),
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

// --- Allowlist / gate unit tests ---

#[test]
fn test_allowlist_permits_public_endpoints() {
    let allowlist = Allowlist::standard();

    assert!(allowlist.permits("/api/projects/list"));
    assert!(allowlist.permits("/api/projects/validate-key"));
    assert!(allowlist.permits("/api/images/12345"));
    assert!(allowlist.permits("/api/images/0000000"));
}

#[test]
fn test_allowlist_rejects_protected_endpoints() {
    let allowlist = Allowlist::standard();

    assert!(!allowlist.permits("/api/projects/save"));
    assert!(!allowlist.permits("/api/projects/delete"));
    assert!(!allowlist.permits("/api/projects/reorder"));
    assert!(!allowlist.permits("/api/images/upload"));
}

#[test]
fn test_allowlist_numeric_tail_requires_digits_only() {
    let allowlist = Allowlist::standard();

    // Anything but a purely numeric identifier stays behind the gate.
    assert!(!allowlist.permits("/api/images/abc123"));
    assert!(!allowlist.permits("/api/images/12a45"));
    assert!(!allowlist.permits("/api/images/"));
    assert!(!allowlist.permits("/api/images/123/extra"));
}

#[test]
fn test_gate_validation_is_exact() {
    let gate = ApiKeyGate::new("Secret".to_string());

    assert!(gate.validate("Secret"));
    // Case-sensitive, no trimming.
    assert!(!gate.validate("secret"));
    assert!(!gate.validate("SECRET"));
    assert!(!gate.validate("Secret "));
    assert!(!gate.validate(" Secret"));
    assert!(!gate.validate(""));
}

// --- HTTP-level gate behavior ---

#[tokio::test]
async fn test_numeric_image_fetch_passes_without_secret() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // No secret presented: the gate lets the all-digits path through, and the
    // empty store answers 404 rather than the gate answering 401.
    let response = client
        .get(format!("{}/api/images/12345", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_non_numeric_image_fetch_requires_secret() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/images/abc123", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.unwrap(), "Unauthorized");

    // With the secret the request clears the gate; the unknown id then 404s.
    let response = client
        .get(format!("{}/api/images/abc123", address))
        .header("Authorization", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_protected_endpoint_rejects_missing_and_wrong_secret() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "id": "p1", "title": "A", "brief": "b", "description": "d",
        "technologies": [], "orderIndex": 0
    });

    let response = client
        .post(format!("{}/api/projects/save", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.unwrap(), "Unauthorized");

    let response = client
        .post(format!("{}/api/projects/save", address))
        .header("Authorization", "wrong-key")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_query_parameter_fallback_authorizes() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // No Authorization header; the apiKey query parameter carries the secret.
    let response = client
        .delete(format!(
            "{}/api/projects/delete?id=ghost&apiKey={}",
            address, API_KEY
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_header_takes_precedence_over_query_parameter() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // A wrong header is not rescued by a correct query parameter: the header,
    // when present, is the presented secret.
    let response = client
        .delete(format!(
            "{}/api/projects/delete?id=ghost&apiKey={}",
            address, API_KEY
        ))
        .header("Authorization", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_public_listing_and_health_need_no_secret() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/projects/list", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(format!("{}/health", address)).send().await.unwrap();
    assert_eq!(response.status(), 200);
}
