use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ai_client::{AnalysisService, Upload};
use models::AnalysisResult;

use crate::context::ResultContext;
use crate::error::{Result, SessionError};
use crate::InFlight;

pub const NO_FILE_SELECTED: &str = "Please select a PDF file first";
pub const NOT_A_PDF: &str = "Please select a PDF file";
pub const ANALYSIS_FAILED: &str = "Analysis failed. Please try again.";

/// Sends a statement to the analysis service and loads the outcome, one
/// submission at a time.
pub struct AnalysisSubmission {
    service: Arc<dyn AnalysisService>,
    in_flight: Arc<AtomicBool>,
}

/// Entry checks done before anything is sent.
pub fn validate_upload(upload: Option<Upload>) -> Result<Upload> {
    let upload = upload.ok_or_else(|| SessionError::Validation(NO_FILE_SELECTED.to_string()))?;
    if !upload.file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(SessionError::Validation(NOT_A_PDF.to_string()));
    }
    Ok(upload)
}

impl AnalysisSubmission {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// On success the new result replaces the one in `context`. Service and
    /// network failures surface as [`SessionError::Transport`] carrying the
    /// generic banner text; the cause is logged and kept as the error source.
    pub async fn submit(
        &self,
        upload: Option<Upload>,
        context: &ResultContext,
    ) -> Result<Arc<AnalysisResult>> {
        let upload = validate_upload(upload)?;
        let Some(in_flight) = InFlight::acquire(Arc::clone(&self.in_flight)) else {
            return Err(SessionError::Busy);
        };

        let file_name = upload.file_name.clone();
        let outcome = self.service.analyze(upload).await;
        drop(in_flight);

        match outcome {
            Ok(result) => Ok(context.load(result)),
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "statement analysis failed");
                Err(SessionError::Transport {
                    message: ANALYSIS_FAILED.to_string(),
                    source: e,
                })
            }
        }
    }
}
