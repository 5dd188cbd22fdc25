use async_trait::async_trait;
use models::AnalysisResult;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{parse_endpoint, truncate_body, ClientError, Result};

/// Answers a free-text question using an analysis as context.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn ask(&self, query: &str, results: &AnalysisResult) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
    results: &'a AnalysisResult,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: Option<String>,
    error: Option<String>,
}

/// JSON-over-HTTP assistant: `POST {query, results}` -> `{answer}` | `{error}`.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    http: Client,
    endpoint: Url,
}

impl HttpAssistantClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn ask(&self, query: &str, results: &AnalysisResult) -> Result<String> {
        tracing::debug!(endpoint = %self.endpoint, query_len = query.len(), "asking assistant");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&AskRequest { query, results })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_answer(status, &body)
    }
}

/// Maps an assistant HTTP response onto an answer or a typed failure.
pub fn interpret_answer(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Status {
            status,
            body: truncate_body(body),
        });
    }

    let parsed: AskResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::Malformed(format!("{e}; body: {}", truncate_body(body))))?;

    match (parsed.answer, parsed.error) {
        (_, Some(error)) => Err(ClientError::Service(error)),
        (Some(answer), None) => Ok(answer.trim().to_string()),
        (None, None) => Err(ClientError::Malformed(
            "response had neither 'answer' nor 'error'".to_string(),
        )),
    }
}
