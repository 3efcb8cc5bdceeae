//! Client side of the backend contract: branch listing and record creation.

pub mod http;
pub mod memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::account::SubmissionPayload;
use crate::admin::AdminPayload;

pub use http::HttpAccountApi;
pub use memory::InMemoryAccountApi;

/// Branch as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: u32,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Branch {
    pub fn display_label(&self) -> String {
        if self.location.is_empty() {
            format!("{} ({}) #{}", self.name, self.code, self.id)
        } else {
            format!("{} ({}, {}) #{}", self.name, self.code, self.location, self.id)
        }
    }
}

/// What the backend hands back when it accepts a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reference: Option<String>,
    pub message: Option<String>,
}

impl SubmissionReceipt {
    pub fn from_body(body: &Value) -> Self {
        let reference = ["accountNumber", "reference", "id"]
            .iter()
            .find_map(|key| match body.get(*key) {
                Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
                Some(Value::Number(number)) => Some(number.to_string()),
                _ => None,
            });
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { reference, message }
    }

    pub fn from_text(text: &str) -> Self {
        serde_json::from_str::<Value>(text)
            .map(|body| Self::from_body(&body))
            .unwrap_or_default()
    }
}

/// Network or server failure. `message` is what the operator sees; when the
/// server returned field errors they take precedence over everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
    pub field_errors: BTreeMap<String, String>,
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Extracts a message from whatever shape the server returned: a plain
    /// string, a field-keyed `errors` map, `message`, or `title`.
    pub fn from_body(status: Option<u16>, body: &Value) -> Self {
        let field_errors = body
            .get("errors")
            .and_then(Value::as_object)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|(field, detail)| {
                        flatten_messages(detail).map(|text| (field.clone(), text))
                    })
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();

        let message = if !field_errors.is_empty() {
            field_errors
                .iter()
                .map(|(field, text)| format!("{}: {}", field, text))
                .collect::<Vec<_>>()
                .join("; ")
        } else {
            match body {
                Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
                Value::Array(_) => flatten_messages(body).unwrap_or_else(|| fallback(status)),
                _ => ["message", "title", "error"]
                    .iter()
                    .find_map(|key| {
                        body.get(*key)
                            .and_then(Value::as_str)
                            .filter(|text| !text.trim().is_empty())
                            .map(|text| text.trim().to_string())
                    })
                    .unwrap_or_else(|| fallback(status)),
            }
        };

        Self {
            status,
            message,
            field_errors,
        }
    }

    /// Parses a raw response body; non-JSON text is taken as the message.
    pub fn from_text(status: Option<u16>, text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => Self::from_body(status, &body),
            Err(_) => Self::from_body(status, &Value::String(text.to_string())),
        }
    }
}

fn flatten_messages(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_messages).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn fallback(status: Option<u16>) -> String {
    match status {
        Some(code) => format!("Request failed with status {}", code),
        None => "Request failed".to_string(),
    }
}

/// Backend operations the wizards depend on.
pub trait AccountApi {
    fn list_branches(&self) -> Result<Vec<Branch>, RemoteError>;

    fn create_account(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, RemoteError>;

    fn create_administrator(&self, payload: &AdminPayload)
        -> Result<SubmissionReceipt, RemoteError>;
}

/// Active branches only, sorted by name for selection lists.
pub fn active_branches(api: &dyn AccountApi) -> Result<Vec<Branch>, RemoteError> {
    let mut branches: Vec<Branch> = api
        .list_branches()?
        .into_iter()
        .filter(|branch| branch.active)
        .collect();
    branches.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_body_is_the_message() {
        let err = RemoteError::from_text(Some(400), "Customer already exists");
        assert_eq!(err.message, "Customer already exists");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn message_beats_title() {
        let err = RemoteError::from_body(
            Some(409),
            &json!({"message": "Duplicate account", "title": "Conflict"}),
        );
        assert_eq!(err.message, "Duplicate account");
        let err = RemoteError::from_body(Some(409), &json!({"title": "Conflict"}));
        assert_eq!(err.message, "Conflict");
    }

    #[test]
    fn field_errors_take_precedence() {
        let body = json!({
            "title": "One or more validation errors occurred.",
            "message": "Bad request",
            "errors": {
                "BranchId": ["Branch is closed"],
                "InitialDeposit": ["Below minimum", "Must be numeric"]
            }
        });
        let err = RemoteError::from_body(Some(422), &body);
        assert_eq!(
            err.message,
            "BranchId: Branch is closed; InitialDeposit: Below minimum, Must be numeric"
        );
        assert_eq!(err.field_errors.len(), 2);
    }

    #[test]
    fn unknown_shape_falls_back_to_status() {
        let err = RemoteError::from_body(Some(500), &json!({"trace": 42}));
        assert_eq!(err.message, "Request failed with status 500");
    }

    #[test]
    fn receipt_reads_reference_keys() {
        let receipt = SubmissionReceipt::from_text(r#"{"accountNumber":"HTG-0001","message":"ok"}"#);
        assert_eq!(receipt.reference.as_deref(), Some("HTG-0001"));
        assert_eq!(receipt.message.as_deref(), Some("ok"));
        let receipt = SubmissionReceipt::from_text(r#"{"id": 77}"#);
        assert_eq!(receipt.reference.as_deref(), Some("77"));
    }
}
