use async_trait::async_trait;
use models::AnalysisResult;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{parse_endpoint, truncate_body, ClientError, Result};

/// A statement file selected by the user.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Turns an uploaded statement into an analysis result.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, upload: Upload) -> Result<AnalysisResult>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Multipart `POST` with the statement in the `file` field.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: Client,
    endpoint: Url,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let http = Client::builder().build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, upload: Upload) -> Result<AnalysisResult> {
        tracing::info!(
            endpoint = %self.endpoint,
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "submitting statement for analysis"
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_analysis(status, &body)
    }
}

/// Success bodies must parse as an [`AnalysisResult`]; failures carry the
/// service's `{error}` text when there is one.
pub fn interpret_analysis(status: u16, body: &str) -> Result<AnalysisResult> {
    if !(200..300).contains(&status) {
        if let Ok(ErrorBody { error }) = serde_json::from_str(body) {
            return Err(ClientError::Service(error));
        }
        return Err(ClientError::Status {
            status,
            body: truncate_body(body),
        });
    }

    serde_json::from_str(body)
        .map_err(|e| ClientError::Malformed(format!("{e}; body: {}", truncate_body(body))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let body = r#"{
            "total_waste": 1530.5,
            "transaction_count": 18,
            "category_summary": {
                "repeating_charges": {"count": 1, "total": 597},
                "micro_transactions": {"count": 3, "total": 150},
                "fees": {"count": 2, "total": 40},
                "penalties": {"count": 0, "total": 0}
            },
            "top_merchants": [{"name": "Netflix Subscription", "amount": 597, "count": 3}],
            "repeating_charges": [{"merchant": "Netflix Subscription", "count": 3, "total": 597, "lines": ["a", "b"]}],
            "micro_transactions": [],
            "fees": [{"line": "ATM FEE 20.00 DR", "amount": 20}],
            "penalties": [],
            "suggestions": ["Review your recurring subscriptions"]
        }"#;
        let result = interpret_analysis(200, body).unwrap();
        assert_eq!(result.transaction_count, 18);
        assert_eq!(result.repeating_charges[0].count, 3);
        assert_eq!(result.fees[0].category, None);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_error_body_on_bad_request() {
        let err = interpret_analysis(400, r#"{"error": "Only PDF files are allowed"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Service(ref m) if m == "Only PDF files are allowed"));
    }

    #[test]
    fn test_opaque_failure() {
        let err = interpret_analysis(500, "Internal Server Error").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }

    #[test]
    fn test_malformed_success() {
        let err = interpret_analysis(200, r#"{"alerts": [{"title": "x", "severity": "urgent"}]}"#).unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }
}
