//! Server-rendered form and list pages.
//!
//! # Responsibility
//! - `GET /` renders the input form.
//! - `POST /save` creates a record and re-renders the form with the outcome.
//! - `GET /list` renders every record in creation order.
//!
//! # Invariants
//! - Submissions never redirect; the outcome is shown on the same page.
//! - Store error details stay in logs.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use intfeed_core::RecordServiceError;
use log::{debug, error};
use serde::Deserialize;

use crate::api::{DUPLICATE_MESSAGE, GENERIC_FAILURE_MESSAGE, SAVED_MESSAGE};
use crate::render::{index_page, list_page};
use crate::state::AppState;

const LIST_FAILURE_MESSAGE: &str = "Could not retrieve list of users.";

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub name: Option<String>,
    pub age: Option<String>,
}

/// `GET /`
pub async fn index() -> Html<String> {
    Html(index_page(None, None))
}

/// `POST /save`
pub async fn save(
    State(state): State<AppState>,
    form: Result<Form<SaveForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            debug!(
                "event=page_save module=pages status=rejected reason=invalid_form error={}",
                rejection.body_text()
            );
            return error_page(StatusCode::BAD_REQUEST, "Error: Invalid form submission.");
        }
    };

    let outcome = state
        .run("record_create", move |service| {
            service.create(form.name.as_deref(), form.age.as_deref())
        })
        .await;

    match outcome {
        Ok(_) => (
            StatusCode::OK,
            Html(index_page(Some(&format!("Success: {SAVED_MESSAGE}")), None)),
        ),
        Err(RecordServiceError::Validation(err)) => {
            error_page(StatusCode::BAD_REQUEST, &format!("Error: {err}."))
        }
        Err(RecordServiceError::Duplicate) => error_page(
            StatusCode::CONFLICT,
            &format!("Error: {DUPLICATE_MESSAGE}"),
        ),
        Err(RecordServiceError::StoreUnavailable(details)) => {
            error!(
                "event=page_save module=pages status=error error_code=store_unavailable error={details}"
            );
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error: {GENERIC_FAILURE_MESSAGE}"),
            )
        }
    }
}

/// `GET /list`
pub async fn list(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    match state.run("record_list", |service| service.list()).await {
        Ok(records) => (StatusCode::OK, Html(list_page(&records, None))),
        Err(err) => {
            error!("event=page_list module=pages status=error error={err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(list_page(&[], Some(LIST_FAILURE_MESSAGE))),
            )
        }
    }
}

fn error_page(status: StatusCode, error: &str) -> (StatusCode, Html<String>) {
    (status, Html(index_page(None, Some(error))))
}
