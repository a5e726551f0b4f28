use std::collections::BTreeMap;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use validator::ValidationErrors;

/// Map of field name (camelCase, as it appears on the wire) to the first
/// violated rule's message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Display)]
pub enum AppError {
    #[display("Validation failed")]
    ValidationError(FieldErrors),

    #[display("{_0}")]
    BadRequest(String),

    #[display("Too many requests")]
    RateLimited(String),

    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("Unauthorized access")]
    UnauthorizedAccess,

    #[display("Service unavailable: {_0}")]
    ServiceUnavailable(String),

    #[display("Internal server error: {_0}")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "message": "Please correct the highlighted fields and try again.",
                    "errors": errors
                })
            }
            AppError::BadRequest(msg) => {
                serde_json::json!({ "success": false, "message": msg })
            }
            AppError::RateLimited(msg) => {
                serde_json::json!({ "success": false, "message": msg })
            }
            AppError::NotFound(msg) => {
                serde_json::json!({ "success": false, "message": msg })
            }
            AppError::UnauthorizedAccess => {
                serde_json::json!({ "success": false, "message": "Authentication required" })
            }
            AppError::ServiceUnavailable(detail) => {
                tracing::error!("dependency unavailable: {}", detail);
                serde_json::json!({
                    "success": false,
                    "message": "We're experiencing technical difficulties. Please try again shortly."
                })
            }
            AppError::InternalError(detail) => {
                tracing::error!("internal error: {}", detail);
                serde_json::json!({
                    "success": false,
                    "message": "We're experiencing technical difficulties. Please try again shortly."
                })
            }
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }

    /// Single-field validation error, keyed the way the client sent the field.
    pub fn field_error(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        AppError::ValidationError(errors)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(field_error_map(errors))
    }
}

/// Flatten derive-produced validation errors into the wire-facing map,
/// keeping only the first violation per field.
pub fn field_error_map(errors: ValidationErrors) -> FieldErrors {
    let mut field_errors = FieldErrors::new();

    for (field, violations) in errors.field_errors() {
        if let Some(first) = violations.first() {
            let message = first
                .message
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| default_message(first.code.as_ref()));
            field_errors.entry(snake_to_camel(&field)).or_insert(message);
        }
    }

    field_errors
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::ServiceUnavailable(format!("Database error: {}", err))
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

fn default_message(code: &str) -> String {
    match code {
        "email" => "Must be a valid email address".to_string(),
        "length" => "Value is outside the allowed length".to_string(),
        _ => "Invalid value".to_string(),
    }
}

/// Struct fields are snake_case but the JSON API speaks camelCase; error
/// keys must match what the client sent.
pub fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
