//! JSON adapter for record use-cases.
//!
//! # Responsibility
//! - Expose `POST/GET /api/users` and `GET /health`.
//! - Map `RecordServiceError` onto stable status codes and messages.
//!
//! # Invariants
//! - Duplicate rejections are always 409 and never confused with 500.
//! - Store error details stay in logs; clients get a generic message.
//! - Unsupported methods answer 405 with `Allow: GET, POST`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use intfeed_core::{core_version, Record, RecordServiceError};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::AppState;

pub(crate) const SAVED_MESSAGE: &str = "Record saved successfully!";
pub(crate) const DUPLICATE_MESSAGE: &str = "Duplicate record already exists.";
pub(crate) const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";
const LIST_FAILURE_MESSAGE: &str = "Could not retrieve users.";
const ALLOWED_METHODS: &str = "GET, POST";

/// Create payload. `age` may arrive as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct CreateRecordBody {
    pub name: Option<String>,
    pub age: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub user: Record,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<u64>,
}

/// Non-2xx JSON response carrying `{"error": ...}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    error: String,
}

impl ApiFailure {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    fn from_service_error(err: RecordServiceError, operation: &str, generic: &str) -> Self {
        match err {
            RecordServiceError::Validation(err) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            RecordServiceError::Duplicate => Self::new(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
            RecordServiceError::StoreUnavailable(details) => {
                error!(
                    "event={operation} module=api status=error error_code=store_unavailable error={details}"
                );
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, generic)
            }
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.error }))).into_response()
    }
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecordBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiFailure> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(
            "event=api_create module=api status=rejected reason=invalid_json error={}",
            rejection.body_text()
        );
        ApiFailure::new(rejection.status(), "Invalid JSON body.")
    })?;

    let name = body.name;
    let age = body.age.and_then(age_text);
    let user = state
        .run("record_create", move |service| {
            service.create(name.as_deref(), age.as_deref())
        })
        .await
        .map_err(|err| ApiFailure::from_service_error(err, "api_create", GENERIC_FAILURE_MESSAGE))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: SAVED_MESSAGE,
            user,
        }),
    ))
}

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiFailure> {
    let records = state
        .run("record_list", |service| service.list())
        .await
        .map_err(|err| ApiFailure::from_service_error(err, "api_list", LIST_FAILURE_MESSAGE))?;
    Ok(Json(records))
}

/// Any other method on `/api/users`.
pub async fn method_not_allowed(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    match state.run("health", |service| service.count()).await {
        Ok(records) => Json(HealthResponse {
            status: "ok",
            version: core_version(),
            records: Some(records),
        })
        .into_response(),
        Err(err) => {
            error!("event=health module=api status=error error={err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version: core_version(),
                    records: None,
                }),
            )
                .into_response()
        }
    }
}

/// Renders a JSON `age` as text for integer parsing.
///
/// `null` counts as absent. Non-scalar values keep their JSON text so the
/// validation error shows what was sent.
fn age_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::age_text;
    use serde_json::json;

    #[test]
    fn age_text_coerces_numbers_and_strings() {
        assert_eq!(age_text(json!(30)).as_deref(), Some("30"));
        assert_eq!(age_text(json!("31")).as_deref(), Some("31"));
        assert_eq!(age_text(json!(30.5)).as_deref(), Some("30.5"));
        assert_eq!(age_text(json!(null)), None);
        assert_eq!(age_text(json!([1])).as_deref(), Some("[1]"));
    }
}
