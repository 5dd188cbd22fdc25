//! HTTP clients for the two external services the results workspace talks to:
//! the statement analysis endpoint and the assistant that answers questions
//! about an analysis.
//!
//! Both sit behind traits so the session layer can be driven by fakes in tests.

mod analysis;
mod assistant;

pub use analysis::{interpret_analysis, AnalysisService, HttpAnalysisClient, Upload};
pub use assistant::{interpret_answer, AssistantClient, HttpAssistantClient};

use reqwest::Url;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service reported an error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Accepts absolute http(s) URLs only.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            })
        }
    }

    if url.host_str().is_none() {
        return Err(ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Error bodies are echoed into diagnostics only; keep them short.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
