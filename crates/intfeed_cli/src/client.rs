//! HTTP transport for the records JSON API.
//!
//! # Responsibility
//! - Fetch the record list and submit new records.
//! - Classify create responses by status without reinterpreting server text.

use intfeed_core::Record;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    /// Server answered a list request with a non-success status.
    UnexpectedStatus(StatusCode),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected response status {status}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::UnexpectedStatus(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Server verdict on one create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { message: String, user: Record },
    Duplicate { error: String },
    Rejected { status: u16, error: Option<String> },
}

/// Records API seen from a client.
pub trait RecordsApi {
    async fn fetch_records(&self) -> Result<Vec<Record>, ClientError>;
    async fn create_record(&self, name: &str, age: &str) -> Result<CreateOutcome, ClientError>;
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    message: String,
    user: Record,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `reqwest`-backed client for `/api/users`.
pub struct HttpRecordsApi {
    http: reqwest::Client,
    url: String,
}

impl HttpRecordsApi {
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl RecordsApi for HttpRecordsApi {
    async fn fetch_records(&self) -> Result<Vec<Record>, ClientError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }
        Ok(response.json::<Vec<Record>>().await?)
    }

    async fn create_record(&self, name: &str, age: &str) -> Result<CreateOutcome, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .json(&create_payload(name, age))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(classify_create_response(status, &body))
    }
}

/// Sends `age` as a JSON number when it is one, otherwise as typed so the
/// server reports the validation error.
fn create_payload(name: &str, age: &str) -> Value {
    match age.trim().parse::<i64>() {
        Ok(age) => json!({ "name": name, "age": age }),
        Err(_) if age.trim().is_empty() => json!({ "name": name }),
        Err(_) => json!({ "name": name, "age": age }),
    }
}

fn classify_create_response(status: StatusCode, body: &[u8]) -> CreateOutcome {
    let error = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|body| body.error);

    if status == StatusCode::CREATED {
        if let Ok(created) = serde_json::from_slice::<CreatedBody>(body) {
            return CreateOutcome::Created {
                message: created.message,
                user: created.user,
            };
        }
    }

    if status == StatusCode::CONFLICT {
        if let Some(error) = error {
            return CreateOutcome::Duplicate { error };
        }
    }

    CreateOutcome::Rejected {
        status: status.as_u16(),
        error,
    }
}
