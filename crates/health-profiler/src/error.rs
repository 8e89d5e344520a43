use crate::config::ConfigError;
use crate::profile::router::IncompleteProfileResponse;
use crate::profile::ProfileServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    BadRequest(String),
    Task(tokio::task::JoinError),
    Profile(ProfileServiceError),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
            AppError::Task(err) => write!(f, "assessment task failed: {}", err),
            AppError::Profile(err) => write!(f, "profile error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::BadRequest(_) => None,
            AppError::Task(err) => Some(err),
            AppError::Profile(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Profile(ProfileServiceError::Incomplete(incomplete)) => {
                let body = Json(IncompleteProfileResponse::from(&incomplete));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Profile(err @ ProfileServiceError::MissingSurvey) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}

impl From<ProfileServiceError> for AppError {
    fn from(value: ProfileServiceError) -> Self {
        Self::Profile(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
