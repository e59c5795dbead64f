//! Server test utilities.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use laz_server::storage::Database;
use laz_server::{create_router, AppState};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const REMOTE_PEER: &str = "203.0.113.10:50000";
pub const LOCAL_PEER: &str = "127.0.0.1:50000";

/// A router backed by a throwaway database.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub db: Arc<Database>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db = Arc::new(
            Database::new(&temp_dir.path().join("data").join("laz.db"), 5)
                .await
                .expect("Failed to open database"),
        );
        let router = create_router(AppState::new(db.clone()));

        Self {
            router,
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request from `peer`, optionally via a proxy header.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        peer: &str,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, Value) {
        let peer: SocketAddr = peer.parse().expect("valid peer address");
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .extension(ConnectInfo(peer));

        if let Some(forwarded) = forwarded_for {
            builder = builder.header("X-Forwarded-For", forwarded);
        }

        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn vote(&self, slug: &str, direction: &str, peer: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/vote",
            Some(serde_json::json!({ "slug": slug, "direction": direction })),
            peer,
            None,
        )
        .await
    }

    pub async fn votes(&self, slug: &str, peer: &str) -> (StatusCode, Value) {
        self.request("GET", &format!("/api/votes/{}", slug), None, peer, None)
            .await
    }

    pub async fn subscribe(&self, email: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/subscribe",
            Some(serde_json::json!({ "email": email })),
            REMOTE_PEER,
            None,
        )
        .await
    }
}
