use std::time::Duration;

use thiserror::Error;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unable to open PDF: {0}")]
    Unreadable(String),
    #[error("PDF extraction timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Extraction task failed: {0}")]
    Task(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Turns an uploaded document payload into raw text, one page after another.
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, data: &[u8]) -> ExtractionResult<String>;
}

/// Text-layer extraction backed by `pdf-extract`. Scanned pages yield no text.
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: EXTRACTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, data: &[u8]) -> ExtractionResult<String> {
        let bytes = data.to_vec();

        // pdf-extract is CPU bound and may panic on malformed input; a panic
        // surfaces here as a join error instead of taking the worker down.
        let text = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)),
        )
        .await
        .map_err(|_| ExtractionError::TimedOut(self.timeout))?
        .map_err(|e| ExtractionError::Task(e.to_string()))?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        tracing::debug!(chars = text.len(), "PDF text extraction complete");

        Ok(text)
    }
}
