//! Client-side view state for one terminal session.
//!
//! # Responsibility
//! - Track the submission lifecycle and the locally cached record list.
//! - Refresh the list on request and after every successful submission.
//!
//! # Invariants
//! - A submission always leaves `Submitting` for exactly one outcome state.
//! - Server error text is shown as received; only transport failures get a
//!   local message.
//! - Nothing is retried automatically.

use crate::client::{ClientError, CreateOutcome, RecordsApi};
use intfeed_core::Record;
use log::{error, warn};
use std::fmt::Write;

const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(String),
    DuplicateRejected(String),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Session {
    records: Vec<Record>,
    /// Set while the last refresh failed and `records` may be out of date.
    stale: bool,
    state: SubmissionState,
}

impl Session {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replaces the local list with the server's.
    pub async fn refresh(&mut self, api: &impl RecordsApi) -> Result<(), ClientError> {
        match api.fetch_records().await {
            Ok(records) => {
                self.records = records;
                self.stale = false;
                Ok(())
            }
            Err(err) => {
                error!("event=records_fetch module=session status=error error={err}");
                self.stale = true;
                Err(err)
            }
        }
    }

    /// Runs one submission through `Submitting` to an outcome state.
    pub async fn submit(&mut self, api: &impl RecordsApi, name: &str, age: &str) {
        self.state = SubmissionState::Submitting;
        let outcome = api.create_record(name, age).await;
        self.state = outcome_state(outcome);

        if matches!(self.state, SubmissionState::Success(_)) {
            // A failed refresh marks the list stale; the submission itself succeeded.
            let _ = self.refresh(api).await;
        }
    }

    /// Returns to `Idle` once the outcome has been shown.
    pub fn acknowledge(&mut self) -> SubmissionState {
        std::mem::take(&mut self.state)
    }
}

fn outcome_state(outcome: Result<CreateOutcome, ClientError>) -> SubmissionState {
    match outcome {
        Ok(CreateOutcome::Created { message, .. }) => SubmissionState::Success(message),
        Ok(CreateOutcome::Duplicate { error }) => SubmissionState::DuplicateRejected(error),
        Ok(CreateOutcome::Rejected { status, error }) => {
            warn!("event=record_submit module=session status=rejected http_status={status}");
            SubmissionState::Failed(error.unwrap_or_else(|| TRANSPORT_FAILURE_MESSAGE.to_string()))
        }
        Err(err) => {
            error!("event=record_submit module=session status=error error={err}");
            SubmissionState::Failed(TRANSPORT_FAILURE_MESSAGE.to_string())
        }
    }
}

/// Renders records as a fixed-width table.
pub fn render_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let name_width = records
        .iter()
        .map(|record| record.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<name_width$}  {:>5}", "#", "Name", "Age");
    for record in records {
        let _ = writeln!(
            out,
            "{:>6}  {:<name_width$}  {:>5}",
            record.id, record.name, record.age
        );
    }
    out
}
