use crate::{registry::FormRegistry, validation};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct AppState {
    pub registry: Arc<FormRegistry>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Per-field messages, empty when the field passed
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub email_error: String,
    pub password_error: String,
    pub is_valid: bool,
}

impl From<validation::ValidationResult> for ValidationReport {
    fn from(result: validation::ValidationResult) -> Self {
        Self {
            email_error: result.email_message(),
            password_error: result.password_message(),
            is_valid: result.is_valid(),
        }
    }
}

/// Stateless validation of a credentials pair
pub async fn validate(Json(req): Json<ValidateRequest>) -> Json<ValidationReport> {
    let report = ValidationReport::from(validation::validate(&req.email, &req.password));
    tracing::debug!(is_valid = report.is_valid, "Validated credentials via API");
    Json(report)
}
