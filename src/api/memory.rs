use std::cell::{Cell, RefCell};

use serde::Serialize;
use serde_json::Value;

use crate::account::SubmissionPayload;
use crate::admin::AdminPayload;

use super::{AccountApi, Branch, RemoteError, SubmissionReceipt};

/// Backend stand-in that records payloads instead of sending them.
#[derive(Default)]
pub struct InMemoryAccountApi {
    branches: Vec<Branch>,
    submissions: RefCell<Vec<Value>>,
    failure: RefCell<Option<RemoteError>>,
    issued: Cell<u32>,
}

impl InMemoryAccountApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = branches;
        self
    }

    /// Makes the next create call fail with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        *self.failure.borrow_mut() = Some(error);
    }

    /// Every payload received so far, as serialized JSON.
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.submissions.borrow().len()
    }

    fn record<T: Serialize>(&self, prefix: &str, payload: &T) -> Result<SubmissionReceipt, RemoteError> {
        let body = serde_json::to_value(payload)
            .map_err(|err| RemoteError::transport(format!("Payload not serializable: {err}")))?;
        self.submissions.borrow_mut().push(body);
        if let Some(error) = self.failure.borrow_mut().take() {
            return Err(error);
        }
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ok(SubmissionReceipt {
            reference: Some(format!("{}-{:05}", prefix, next)),
            message: Some("Recorded locally (dry run)".into()),
        })
    }
}

impl AccountApi for InMemoryAccountApi {
    fn list_branches(&self) -> Result<Vec<Branch>, RemoteError> {
        Ok(self.branches.clone())
    }

    fn create_account(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, RemoteError> {
        self.record("ACC", payload)
    }

    fn create_administrator(
        &self,
        payload: &AdminPayload,
    ) -> Result<SubmissionReceipt, RemoteError> {
        self.record("ADM", payload)
    }
}

/// Branch list served by dry runs.
pub fn sample_branches() -> Vec<Branch> {
    vec![
        Branch {
            id: 1,
            name: "Delmas".into(),
            code: "DLM".into(),
            location: "Port-au-Prince".into(),
            active: true,
        },
        Branch {
            id: 2,
            name: "Cap-Haïtien".into(),
            code: "CAP".into(),
            location: "Nord".into(),
            active: true,
        },
        Branch {
            id: 3,
            name: "Jacmel".into(),
            code: "JAC".into(),
            location: "Sud-Est".into(),
            active: false,
        },
    ]
}
