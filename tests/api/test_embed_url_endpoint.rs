// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /embed-url/card and GET /embed-url/dashboard

use super::support::{app, config, embedding_settings, get_json, SECRET};
use axum::http::StatusCode;
use metabase_embed_gateway::{
    config::{EmbeddingSettings, MetabaseSettings},
    embedding::{DisplayOptions, EmbedResource, TokenIssuer},
};

#[tokio::test]
async fn test_card_embed_url_uses_question_viewer() {
    let app = app(config(MetabaseSettings::default(), embedding_settings()));
    let (status, body) = get_json(app, "/embed-url/card?cardId=42").await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    assert_eq!(
        body["iframeUrl"],
        format!(
            "https://bi.example.com/embed/question/{}#bordered=true&titled=true",
            token
        )
    );

    let claims = TokenIssuer::new(SECRET).decode(token).unwrap();
    assert_eq!(claims.resource, EmbedResource::Question(42));
    assert_eq!(body["expiresAt"], claims.exp);
}

#[tokio::test]
async fn test_dashboard_embed_url_honours_display_options() {
    let embedding = EmbeddingSettings {
        display: DisplayOptions {
            bordered: false,
            titled: true,
            hide_parameters: vec!["region".to_string()],
        },
        ..embedding_settings()
    };
    let app = app(config(MetabaseSettings::default(), embedding));
    let (status, body) = get_json(app, "/embed-url/dashboard?dashboardId=3&region=east").await;
    assert_eq!(status, StatusCode::OK);

    let url = body["iframeUrl"].as_str().unwrap();
    assert!(url.starts_with("https://bi.example.com/embed/dashboard/"));
    assert!(url.ends_with("#bordered=false&titled=true&hide_parameters=region"));
}

#[tokio::test]
async fn test_missing_public_site_url_is_configuration_error() {
    let embedding = EmbeddingSettings {
        public_site_url: None,
        ..embedding_settings()
    };
    let app = app(config(MetabaseSettings::default(), embedding));
    let (status, body) = get_json(app, "/embed-url/card?cardId=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "configuration_error");
}
