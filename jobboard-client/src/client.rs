use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::filters::SearchFilters;
use crate::form::JobForm;
use crate::models::{HealthStatus, Job, JobsPage, SearchResults};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    validation: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Client for the job board API.
#[derive(Debug, Clone)]
pub struct JobBoardClient {
    client: Client,
    base_url: Url,
}

impl JobBoardClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("jobboard-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Self::with_client(base_url, client)
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["health"])?;
        let response = self.client.get(url).send().await?;
        parse(response).await
    }

    /// Fetch one page of jobs for the given filter state.
    pub async fn list_jobs(&self, filters: &SearchFilters, page: u32) -> Result<JobsPage, ClientError> {
        self.list_with_query(&filters.to_query(page)).await
    }

    /// Fetch jobs with arbitrary query parameters.
    pub async fn list_with_query<K, V>(&self, params: &[(K, V)]) -> Result<JobsPage, ClientError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.endpoint(&["jobs"])?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        debug!(%url, "listing jobs");
        let response = self.client.get(url).send().await?;
        parse(response).await
    }

    /// Validate the form locally, then submit it.
    pub async fn create_job(&self, form: &JobForm) -> Result<Job, ClientError> {
        form.validate().map_err(ClientError::Form)?;
        let url = self.endpoint(&["jobs"])?;
        let response = self.client.post(url).json(form).send().await?;
        parse::<DataEnvelope<Job>>(response).await.map(|env| env.data)
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ClientError> {
        let url = self.endpoint(&["jobs", id])?;
        let response = self.client.get(url).send().await?;
        parse::<DataEnvelope<Job>>(response).await.map(|env| env.data)
    }

    /// Legacy free-text search.
    pub async fn search_jobs(&self, query: &str) -> Result<SearchResults, ClientError> {
        let url = self.endpoint(&["jobs", "search", query])?;
        let response = self.client.get(url).send().await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
        warn!(status = status.as_u16(), message = %envelope.message, "request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope.message,
            detail: envelope.error,
            validation: envelope.validation,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_built_under_api() {
        let client = JobBoardClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.endpoint(&["jobs", "search", "rust dev"]).unwrap().as_str(),
            "http://localhost:5000/api/jobs/search/rust%20dev"
        );
        let client = JobBoardClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.endpoint(&["health"]).unwrap().as_str(),
            "http://localhost:5000/api/health"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            JobBoardClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            JobBoardClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn incomplete_form_is_rejected_without_a_request() {
        // Nothing listens on this port; a request would fail with Network.
        let client = JobBoardClient::new("http://127.0.0.1:9").unwrap();
        let err = client.create_job(&JobForm::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Form(ref m) if m == "Please fill in the job title"));
    }
}
