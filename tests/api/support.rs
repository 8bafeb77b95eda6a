// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers: an in-process Metabase stand-in and request plumbing.
#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metabase_embed_gateway::{
    api::http_server::{create_app, AppState},
    config::{EmbeddingSettings, GatewayConfig, MetabaseSettings},
    metabase::{MetabaseClient, SESSION_HEADER},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const SECRET: &str = "s3cret";
pub const CARD_ID: i64 = 101;

/// Records every call it receives and rejects the one named in `reject`
/// (e.g. `"PUT /api/card"`).
#[derive(Clone, Default)]
pub struct MockMetabase {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<Value>>>,
    pub reject: Option<&'static str>,
}

impl MockMetabase {
    pub fn rejecting(call: &'static str) -> Self {
        Self {
            reject: Some(call),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Option<Response> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.reject == Some(call) {
            let status = if call == "POST /api/session" {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::FORBIDDEN
            };
            return Some((status, format!("{} rejected", call)).into_response());
        }
        None
    }

    /// Serves on an ephemeral port and returns the base URL.
    pub async fn spawn(&self) -> String {
        async fn session(State(mock): State<MockMetabase>) -> Response {
            if let Some(rejection) = mock.record("POST /api/session") {
                return rejection;
            }
            Json(json!({"id": "session-token"})).into_response()
        }

        async fn create(
            State(mock): State<MockMetabase>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Response {
            if headers.get(SESSION_HEADER).is_none() {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            if let Some(rejection) = mock.record("POST /api/card") {
                return rejection;
            }
            mock.created.lock().unwrap().push(body.clone());
            Json(json!({"id": CARD_ID, "name": body["name"]})).into_response()
        }

        async fn read(State(mock): State<MockMetabase>, Path(id): Path<i64>) -> Response {
            if let Some(rejection) = mock.record("GET /api/card") {
                return rejection;
            }
            Json(json!({"id": id, "enable_embedding": false})).into_response()
        }

        async fn update(State(mock): State<MockMetabase>, Path(_id): Path<i64>) -> Response {
            if let Some(rejection) = mock.record("PUT /api/card") {
                return rejection;
            }
            Json(json!({"enable_embedding": true})).into_response()
        }

        async fn delete(State(mock): State<MockMetabase>, Path(_id): Path<i64>) -> Response {
            let _ = mock.record("DELETE /api/card");
            StatusCode::NO_CONTENT.into_response()
        }

        let app = Router::new()
            .route("/api/session", post(session))
            .route("/api/card", post(create))
            .route("/api/card/:id", get(read).put(update).delete(delete))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }
}

pub fn metabase_settings(site_url: &str) -> MetabaseSettings {
    MetabaseSettings {
        site_url: Some(site_url.to_string()),
        username: Some("admin@example.com".to_string()),
        password: Some("password".to_string()),
    }
}

pub fn embedding_settings() -> EmbeddingSettings {
    EmbeddingSettings {
        secret_key: Some(SECRET.to_string()),
        public_site_url: Some("https://bi.example.com".to_string()),
        ..Default::default()
    }
}

pub fn config(metabase: MetabaseSettings, embedding: EmbeddingSettings) -> GatewayConfig {
    GatewayConfig {
        metabase,
        embedding,
        ..Default::default()
    }
}

pub fn app(config: GatewayConfig) -> Router {
    let client = MetabaseClient::new().unwrap();
    create_app(AppState::new(config, Arc::new(client)))
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
