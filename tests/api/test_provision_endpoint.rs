// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /provision/card against an in-process Metabase

use super::support::{
    app, config, embedding_settings, metabase_settings, post_json, MockMetabase, CARD_ID,
};
use axum::http::StatusCode;
use metabase_embed_gateway::config::MetabaseSettings;
use serde_json::json;

const PAYLOAD: &str = r#"{"cardPayload": {"name": "Revenue", "display": "line"}}"#;

async fn provision_app(mock: &MockMetabase) -> axum::Router {
    let site = mock.spawn().await;
    app(config(metabase_settings(&site), embedding_settings()))
}

#[tokio::test]
async fn test_creates_card_and_enables_embedding() {
    let mock = MockMetabase::default();
    let (status, body) = post_json(provision_app(&mock).await, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], CARD_ID);
    assert_eq!(
        body["message"],
        "Card created and embedding enabled successfully"
    );
    assert_eq!(
        mock.calls(),
        vec![
            "POST /api/session",
            "POST /api/card",
            "GET /api/card",
            "PUT /api/card"
        ]
    );
    assert_eq!(
        mock.created.lock().unwrap()[0],
        json!({"name": "Revenue", "display": "line"})
    );
}

#[tokio::test]
async fn test_embedding_disabled_skips_settings_calls() {
    let mock = MockMetabase::default();
    let (status, body) = post_json(
        provision_app(&mock).await,
        "/provision/card",
        r#"{"cardPayload": {"name": "Revenue"}, "enableEmbedding": false}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], CARD_ID);
    assert_eq!(body["message"], "Card created successfully");
    assert_eq!(mock.calls(), vec!["POST /api/session", "POST /api/card"]);
}

#[tokio::test]
async fn test_update_failure_leaves_card_in_place() {
    let mock = MockMetabase::rejecting("PUT /api/card");
    let (status, body) = post_json(provision_app(&mock).await, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to enable embedding for card");
    assert_eq!(body["error_type"], "upstream_request_error");
    assert_eq!(body["details"]["stage"], "embedding_update");
    assert_eq!(body["details"]["card_id"], CARD_ID);
    assert_eq!(mock.created.lock().unwrap().len(), 1);
    assert!(!mock.calls().iter().any(|c| c.starts_with("DELETE")));
}

#[tokio::test]
async fn test_settings_read_failure_reports_stage() {
    let mock = MockMetabase::rejecting("GET /api/card");
    let (status, body) = post_json(provision_app(&mock).await, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch card settings");
    assert_eq!(body["details"]["stage"], "settings_read");
    assert_eq!(body["details"]["card_id"], CARD_ID);
    assert!(!mock.calls().contains(&"PUT /api/card".to_string()));
}

#[tokio::test]
async fn test_rejected_credentials_are_upstream_auth_error() {
    let mock = MockMetabase::rejecting("POST /api/session");
    let (status, body) = post_json(provision_app(&mock).await, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to authenticate with Metabase");
    assert_eq!(body["error_type"], "upstream_auth_error");
    assert_eq!(body["details"]["upstream_status"], 401);
    assert_eq!(mock.calls(), vec!["POST /api/session"]);
}

#[tokio::test]
async fn test_rejected_creation_includes_upstream_body() {
    let mock = MockMetabase::rejecting("POST /api/card");
    let (status, body) = post_json(provision_app(&mock).await, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to create Metabase card: POST /api/card rejected"
    );
    assert_eq!(body["details"]["stage"], "card_creation");
    assert!(body["details"].get("card_id").is_none());
}

#[tokio::test]
async fn test_all_credentials_missing_are_listed() {
    let app = app(config(MetabaseSettings::default(), embedding_settings()));
    let (status, body) = post_json(app, "/provision/card", PAYLOAD).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Metabase API configuration is missing: site URL, username, password"
    );
    assert_eq!(body["error_type"], "configuration_error");
    assert_eq!(
        body["details"]["missing"],
        json!(["site URL", "username", "password"])
    );
}

#[tokio::test]
async fn test_single_missing_credential_is_named_alone() {
    let mock = MockMetabase::default();
    let site = mock.spawn().await;
    let settings = MetabaseSettings {
        password: None,
        ..metabase_settings(&site)
    };
    let (status, body) = post_json(
        app(config(settings, embedding_settings())),
        "/provision/card",
        PAYLOAD,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Metabase API configuration is missing: password");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_missing_payload_is_bad_request() {
    let mock = MockMetabase::default();
    let (status, body) = post_json(
        provision_app(&mock).await,
        "/provision/card",
        r#"{"enableEmbedding": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Card payload is required");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let mock = MockMetabase::default();
    let (status, body) =
        post_json(provision_app(&mock).await, "/provision/card", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_request");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_dashboard_id_is_merged_into_card_body() {
    let mock = MockMetabase::default();
    let (status, _) = post_json(
        provision_app(&mock).await,
        "/provision/card",
        r#"{"cardPayload": {"name": "Revenue"}, "dashboardId": 8, "enableEmbedding": false}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        mock.created.lock().unwrap()[0],
        json!({"name": "Revenue", "dashboard_id": 8})
    );
}

#[tokio::test]
async fn test_every_call_opens_a_new_session() {
    let mock = MockMetabase::default();
    let app = provision_app(&mock).await;

    for _ in 0..2 {
        let (status, _) = post_json(app.clone(), "/provision/card", PAYLOAD).await;
        assert_eq!(status, StatusCode::OK);
    }

    let sessions = mock
        .calls()
        .iter()
        .filter(|c| c.as_str() == "POST /api/session")
        .count();
    assert_eq!(sessions, 2);
}

#[tokio::test]
async fn test_size_hints_never_block_provisioning() {
    let mock = MockMetabase::default();
    let app = provision_app(&mock).await;

    for hints in [
        r#""cardWidth": 0, "cardHeight": 0"#,
        r#""cardWidth": "6""#,
        r#""cardHeight": 4.5"#,
    ] {
        let body = format!(
            r#"{{"cardPayload": {{"name": "Revenue"}}, "enableEmbedding": false, {}}}"#,
            hints
        );
        let (status, response) = post_json(app.clone(), "/provision/card", &body).await;
        assert_eq!(status, StatusCode::OK, "hints: {}", hints);
        assert_eq!(response["id"], CARD_ID);
    }

    assert_eq!(mock.created.lock().unwrap().len(), 3);
    assert_eq!(
        mock.created.lock().unwrap()[0],
        json!({"name": "Revenue"})
    );
}

#[tokio::test]
async fn test_falsy_payload_is_bad_request() {
    let mock = MockMetabase::default();
    let app = provision_app(&mock).await;

    for payload in ["false", "0", r#""""#] {
        let body = format!(r#"{{"cardPayload": {}}}"#, payload);
        let (status, response) = post_json(app.clone(), "/provision/card", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(response["error"], "Card payload is required");
    }
    assert!(mock.calls().is_empty());
}
