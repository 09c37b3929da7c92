use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::candidate::{Candidate, CandidateResponse, NewCandidate, ReasonUpdate};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin client over the Record Store HTTP API. No retries and no request
/// timeout: a hung request simply never resolves.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn submissions_url(&self) -> String {
        format!("{}/api/submissions", self.base_url)
    }

    /// `/api/submissions/<id>` with `id` percent-encoded as one path segment.
    fn candidate_url(&self, id: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.submissions_url()).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>, ClientError> {
        let response = self.client.get(self.submissions_url()).send().await?;
        decode(response).await
    }

    pub async fn create_candidate(
        &self,
        candidate: &NewCandidate,
    ) -> Result<Candidate, ClientError> {
        let response = self
            .client
            .post(self.submissions_url())
            .json(candidate)
            .send()
            .await?;
        let body: CandidateResponse = decode(response).await?;
        debug!("{}: {}", body.message, body.candidate.id);
        Ok(body.candidate)
    }

    pub async fn update_reason(&self, id: &str, reason: &str) -> Result<Candidate, ClientError> {
        let response = self
            .client
            .put(self.candidate_url(id)?)
            .json(&ReasonUpdate {
                reason: reason.to_string(),
            })
            .send()
            .await?;
        let body: CandidateResponse = decode(response).await?;
        Ok(body.candidate)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_url_encodes_reserved_characters() {
        let client = ApiClient::new("http://localhost:5000/");
        let url = client.candidate_url("a/b?c#d").unwrap();
        assert_eq!(url.path(), "/api/submissions/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_candidate_url_plain_id() {
        let client = ApiClient::new("http://localhost:5000");
        let url = client.candidate_url("1700000000000").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/submissions/1700000000000"
        );
    }

    #[test]
    fn test_candidate_url_rejects_unusable_base() {
        let client = ApiClient::new("not a url");
        assert!(matches!(
            client.candidate_url("1"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
