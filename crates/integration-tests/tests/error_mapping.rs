mod harness;

use axum::Router;
use axum::routing::{get, post};
use harness::config::ConfigBuilder;
use harness::server::{TestServer, sessions};
use portico_core::{Field, GatewayError};
use portico_server::{ApiError, Server};
use serde_json::{Value, json};

async fn expired() -> Result<(), ApiError> {
    Err(GatewayError::Unauthorized("session expired".to_owned()).into())
}

async fn login_required() -> Result<(), ApiError> {
    Err(GatewayError::InsufficientCredentials {
        message: "login required".to_owned(),
        expected: vec![Field::username("username"), Field::password("password")],
    }
    .into())
}

async fn broken() -> Result<(), ApiError> {
    Err(GatewayError::UpstreamUnavailable("remote desktop server refused the connection".to_owned()).into())
}

fn routes() -> Router {
    Router::new()
        .route("/api/connections", get(expired))
        .route("/api/tokens", post(login_required))
        .route("/api/tunnels", get(broken))
}

#[tokio::test]
async fn authorization_failure_invalidates_query_token() {
    let store = sessions(&[("sess-42", "alice"), ("sess-43", "bob")]);
    let builder = Server::builder(ConfigBuilder::new().build())
        .sessions(store.clone())
        .routes(routes());
    let server = TestServer::start_with(builder).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/api/connections?token=sess-42"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "session expired");

    assert!(store.get("sess-42").is_none());
    assert!(store.get("sess-43").is_some());
}

#[tokio::test]
async fn authorization_failure_invalidates_form_token() {
    let store = sessions(&[("sess-form", "carol")]);
    let builder = Server::builder(ConfigBuilder::new().build())
        .sessions(store.clone())
        .routes(routes());
    let server = TestServer::start_with(builder).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/tokens"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=carol&token=sess-form")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["type"], "INSUFFICIENT_CREDENTIALS");
    assert_eq!(
        body["expected"],
        json!([
            { "name": "username", "type": "USERNAME" },
            { "name": "password", "type": "PASSWORD" },
        ])
    );

    assert!(store.get("sess-form").is_none());
}

#[tokio::test]
async fn empty_first_token_leaves_sessions_alone() {
    let store = sessions(&[("sess-42", "alice")]);
    let builder = Server::builder(ConfigBuilder::new().build())
        .sessions(store.clone())
        .routes(routes());
    let server = TestServer::start_with(builder).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/api/connections?token=&token=sess-42"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    assert!(store.get("sess-42").is_some());
}

#[tokio::test]
async fn other_failures_keep_sessions() {
    let store = sessions(&[("sess-42", "alice")]);
    let builder = Server::builder(ConfigBuilder::new().build())
        .sessions(store.clone())
        .routes(routes());
    let server = TestServer::start_with(builder).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/api/tunnels?token=sess-42"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 502);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["type"], "INTERNAL_ERROR");
    assert_eq!(body["statusCode"], 502);

    assert!(store.get("sess-42").is_some());
}

#[tokio::test]
async fn oversized_form_is_rejected_as_json() {
    let store = sessions(&[("sess-42", "alice")]);
    let builder = Server::builder(ConfigBuilder::new().with_form_body_limit(16).build())
        .sessions(store.clone())
        .routes(routes());
    let server = TestServer::start_with(builder).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/tokens?token=sess-42"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=someone-with-a-very-long-name")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["type"], "BAD_REQUEST");

    assert!(store.get("sess-42").is_some());
}
