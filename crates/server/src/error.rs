// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control plane's single error type: every inner error kind from
//! the runtime crates below, mapped to the HTTP status a caller should
//! see and logged once at the boundary before the response is written.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mx_engine::EngineError;
use mx_mission::MissionParseError;
use mx_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Parse(#[from] MissionParseError),

    #[error("mission document does not match the published schema: {0}")]
    SchemaViolation(String),

    #[error("request body is not valid UTF-8 YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to encode response body: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ServerError {
    /// The status code a caller should see. §6 of the control-plane
    /// contract treats "not found"/"bad input" uniformly as 400; the two
    /// exceptions below are genuine state conflicts, which the ambient
    /// error-mapping rule allows to surface as 409 instead.
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(_) => StatusCode::BAD_REQUEST,
            ServerError::Engine(EngineError::AlreadyRunning { .. }) => StatusCode::CONFLICT,
            ServerError::Engine(EngineError::NotArmed { .. }) => StatusCode::BAD_REQUEST,
            ServerError::Engine(EngineError::Store(_)) => StatusCode::BAD_REQUEST,
            ServerError::Engine(EngineError::Parse(_)) => StatusCode::BAD_REQUEST,
            ServerError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Parse(_) => StatusCode::BAD_REQUEST,
            ServerError::SchemaViolation(_) => StatusCode::BAD_REQUEST,
            ServerError::Yaml(_) => StatusCode::BAD_REQUEST,
            ServerError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
