use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::account::SubmissionPayload;
use crate::admin::AdminPayload;
use crate::config::Config;

use super::{AccountApi, Branch, RemoteError, SubmissionReceipt};

/// JSON-over-HTTP client for the console backend.
pub struct HttpAccountApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BranchListing {
    Plain(Vec<Branch>),
    Wrapped { data: Vec<Branch> },
}

impl HttpAccountApi {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| RemoteError::transport(format!("HTTP client setup failed: {err}")))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<String, RemoteError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|err| RemoteError::transport(format!("Backend unreachable: {err}")))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| RemoteError::transport(format!("Unreadable response: {err}")))?;
        if status.is_success() {
            Ok(text)
        } else {
            warn!(status = status.as_u16(), "backend rejected request");
            Err(RemoteError::from_text(Some(status.as_u16()), &text))
        }
    }

    fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<SubmissionReceipt, RemoteError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let text = self.send(self.client.post(url).json(body))?;
        Ok(SubmissionReceipt::from_text(&text))
    }
}

impl AccountApi for HttpAccountApi {
    fn list_branches(&self) -> Result<Vec<Branch>, RemoteError> {
        let url = self.url("branches");
        debug!(%url, "GET");
        let text = self.send(self.client.get(url))?;
        let listing: BranchListing = serde_json::from_str(&text)
            .map_err(|err| RemoteError::transport(format!("Malformed branch listing: {err}")))?;
        Ok(match listing {
            BranchListing::Plain(branches) | BranchListing::Wrapped { data: branches } => branches,
        })
    }

    fn create_account(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, RemoteError> {
        self.post("accounts", payload)
    }

    fn create_administrator(
        &self,
        payload: &AdminPayload,
    ) -> Result<SubmissionReceipt, RemoteError> {
        self.post("administrators", payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = Config {
            api_base_url: "http://localhost:8080/api/".into(),
            ..Config::default()
        };
        let api = HttpAccountApi::new(&config).unwrap();
        assert_eq!(api.url("/branches"), "http://localhost:8080/api/branches");
        assert_eq!(api.url("accounts"), "http://localhost:8080/api/accounts");
    }

    #[test]
    fn branch_listing_accepts_wrapped_shape() {
        let wrapped: BranchListing = serde_json::from_str(
            r#"{"data":[{"id":1,"name":"Delmas","code":"DLM","location":"Port-au-Prince"}]}"#,
        )
        .unwrap();
        match wrapped {
            BranchListing::Wrapped { data } => {
                assert_eq!(data[0].code, "DLM");
                assert!(data[0].active);
            }
            BranchListing::Plain(_) => panic!("expected wrapped listing"),
        }
    }
}
