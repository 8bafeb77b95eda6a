// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::config::ConfigError;
use crate::embedding::{EmbedUrlError, TokenError};
use crate::provisioner::{ProvisionError, ProvisionStage};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{error, warn};

/// JSON body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    InvalidRequest(String),
    NotFound(String),
    Configuration {
        message: String,
        missing: Vec<String>,
    },
    UpstreamAuth {
        message: String,
        upstream_status: Option<u16>,
    },
    UpstreamRequest {
        message: String,
        stage: ProvisionStage,
        card_id: Option<i64>,
        upstream_status: Option<u16>,
    },
    InternalError(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalError(msg) => msg.clone(),
            ApiError::Configuration { message, .. }
            | ApiError::UpstreamAuth { message, .. }
            | ApiError::UpstreamRequest { message, .. } => message.clone(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Configuration { .. } => "configuration_error",
            ApiError::UpstreamAuth { .. } => "upstream_auth_error",
            ApiError::UpstreamRequest { .. } => "upstream_request_error",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let mut details = HashMap::new();
        match self {
            ApiError::Configuration { missing, .. } if !missing.is_empty() => {
                details.insert(
                    "missing".to_string(),
                    serde_json::Value::Array(
                        missing
                            .iter()
                            .map(|m| serde_json::Value::String(m.clone()))
                            .collect(),
                    ),
                );
            }
            ApiError::UpstreamAuth {
                upstream_status, ..
            } => {
                details.insert(
                    "stage".to_string(),
                    serde_json::Value::String(ProvisionStage::Authentication.as_str().to_string()),
                );
                if let Some(status) = upstream_status {
                    details.insert(
                        "upstream_status".to_string(),
                        serde_json::Value::Number((*status).into()),
                    );
                }
            }
            ApiError::UpstreamRequest {
                stage,
                card_id,
                upstream_status,
                ..
            } => {
                details.insert(
                    "stage".to_string(),
                    serde_json::Value::String(stage.as_str().to_string()),
                );
                if let Some(id) = card_id {
                    details.insert(
                        "card_id".to_string(),
                        serde_json::Value::Number((*id).into()),
                    );
                }
                if let Some(status) = upstream_status {
                    details.insert(
                        "upstream_status".to_string(),
                        serde_json::Value::Number((*status).into()),
                    );
                }
            }
            _ => {}
        }

        ErrorResponse {
            error: self.message(),
            error_type: self.error_type().to_string(),
            request_id,
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Configuration { .. }
            | ApiError::UpstreamAuth { .. }
            | ApiError::UpstreamRequest { .. }
            | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Configuration { message, .. } => {
                write!(f, "Configuration error: {}", message)
            }
            ApiError::UpstreamAuth { message, .. } => write!(f, "Upstream auth error: {}", message),
            ApiError::UpstreamRequest { message, stage, .. } => {
                write!(f, "Upstream error during {}: {}", stage.as_str(), message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingIdentifier { .. } | TokenError::InvalidIdentifier { .. } => {
                ApiError::InvalidRequest(err.to_string())
            }
            TokenError::Verification(_) => ApiError::InvalidRequest(err.to_string()),
            TokenError::MissingSecret => ApiError::Configuration {
                message: err.to_string(),
                missing: vec!["secret key".to_string()],
            },
            TokenError::Signing(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<EmbedUrlError> for ApiError {
    fn from(err: EmbedUrlError) -> Self {
        let missing = match err {
            EmbedUrlError::NotConfigured => vec!["public site URL".to_string()],
            EmbedUrlError::Invalid(_) => Vec::new(),
        };
        ApiError::Configuration {
            message: err.to_string(),
            missing,
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        let missing = match &err {
            ConfigError::MissingCredentials { missing } => {
                missing.iter().map(|m| m.to_string()).collect()
            }
        };
        ApiError::Configuration {
            message: err.to_string(),
            missing,
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        let stage = err.stage();
        let card_id = err.card_id();

        match err {
            ProvisionError::InvalidRequest(message) => ApiError::InvalidRequest(message),
            ProvisionError::Configuration(config) => config.into(),
            other => {
                let upstream = other.upstream();
                let upstream_status = match upstream {
                    Some(crate::metabase::MetabaseError::Rejected { status, .. }) => Some(*status),
                    _ => None,
                };

                // Transport and decode failures are not upstream verdicts.
                if upstream_status.is_none() {
                    // Card creation already renders its source in the message.
                    if stage == ProvisionStage::CardCreation {
                        return ApiError::InternalError(other.to_string());
                    }
                    let detail = upstream.map(|e| e.to_string()).unwrap_or_default();
                    return ApiError::InternalError(format!("{}: {}", other, detail));
                }

                if stage == ProvisionStage::Authentication {
                    ApiError::UpstreamAuth {
                        message: other.to_string(),
                        upstream_status,
                    }
                } else {
                    ApiError::UpstreamRequest {
                        message: other.to_string(),
                        stage,
                        card_id,
                        upstream_status,
                    }
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            error!("[{}] {}", request_id, self);
        } else {
            warn!("[{}] {}", request_id, self);
        }

        (status, Json(self.to_response(Some(request_id)))).into_response()
    }
}
