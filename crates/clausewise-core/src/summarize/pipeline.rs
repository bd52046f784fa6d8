use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cleaner::clean;
use super::prompt::{
    reducer_messages, section_messages, smoke_messages, REDUCER_OPTIONS, SECTION_OPTIONS,
    SMOKE_OPTIONS,
};
use super::repair::RepairRegistry;
use crate::gateway::{GatewayError, ModelGateway};
use crate::ingest::{normalize, split_sections, Section, TextExtractor};
use crate::storage::SummarySink;

const DEFAULT_MAP_CONCURRENCY: usize = 4;
const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

pub const NO_TEXT_MESSAGE: &str = "No extractable text. Is this a scanned PDF without OCR?";

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Uploaded file is empty.")]
    EmptyUpload,
    #[error("{0}")]
    UnextractableDocument(String),
    #[error("Model gateway failed: {0}")]
    GatewayFailure(#[from] GatewayError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SummarizeError {
    /// Whether the caller sent something we cannot summarize.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyUpload | Self::UnextractableDocument(_))
    }
}

pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// An uploaded contract, alive for a single request.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub title: String,
    pub text: String,
}

impl SectionSummary {
    pub fn render(&self) -> String {
        format!("### {}\n{}", self.title, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub filename: String,
    pub executive_text: String,
    pub section_summaries: Vec<SectionSummary>,
    pub section_count: usize,
    /// The assembled Markdown document.
    pub text: String,
}

impl FinalSummary {
    pub fn assemble(
        filename: String,
        executive_text: String,
        section_summaries: Vec<SectionSummary>,
    ) -> Self {
        let blocks: Vec<String> = section_summaries.iter().map(SectionSummary::render).collect();
        let text = format!(
            "# Executive Summary\n{executive_text}\n\n# Clause-by-Clause Summary\n{}",
            blocks.join("\n\n")
        );

        Self {
            filename,
            section_count: section_summaries.len(),
            executive_text,
            section_summaries,
            text,
        }
    }

    pub fn render(&self) -> &str {
        &self.text
    }
}

/// Lifecycle of one summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Received,
    Extracted,
    Split,
    Mapping,
    Reducing,
    Assembled,
    Persisted,
    Done,
    Failed(String),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// The single forward successor; terminal stages have none.
    pub fn successor(&self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Extracted),
            Self::Extracted => Some(Self::Split),
            Self::Split => Some(Self::Mapping),
            Self::Mapping => Some(Self::Reducing),
            Self::Reducing => Some(Self::Assembled),
            Self::Assembled => Some(Self::Persisted),
            Self::Persisted => Some(Self::Done),
            Self::Done | Self::Failed(_) => None,
        }
    }

    pub fn can_advance_to(&self, next: &Self) -> bool {
        match next {
            Self::Failed(_) => !self.is_terminal(),
            _ => self.successor().as_ref() == Some(next),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::Extracted => write!(f, "extracted"),
            Self::Split => write!(f, "split"),
            Self::Mapping => write!(f, "mapping"),
            Self::Reducing => write!(f, "reducing"),
            Self::Assembled => write!(f, "assembled"),
            Self::Persisted => write!(f, "persisted"),
            Self::Done => write!(f, "done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

struct Run {
    stage: Stage,
    history: Vec<Stage>,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: Stage::Received,
            history: vec![Stage::Received],
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(&next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, to = %next, "Stage transition");
        self.history.push(next.clone());
        self.stage = next;
    }
}

/// Two-phase map-reduce over the sections of one contract.
pub struct Summarizer {
    extractor: Box<dyn TextExtractor>,
    gateway: Arc<dyn ModelGateway>,
    sink: Option<Arc<dyn SummarySink>>,
    repairs: RepairRegistry,
    map_concurrency: usize,
    persist_timeout: Duration,
}

impl Summarizer {
    pub fn new(extractor: Box<dyn TextExtractor>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            extractor,
            gateway,
            sink: None,
            repairs: RepairRegistry::builtin(),
            map_concurrency: DEFAULT_MAP_CONCURRENCY,
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SummarySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub fn with_repairs(mut self, repairs: RepairRegistry) -> Self {
        self.repairs = repairs;
        self
    }

    /// Section calls in flight at once; 1 summarizes sequentially.
    #[must_use]
    pub fn with_map_concurrency(mut self, limit: usize) -> Self {
        self.map_concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    /// One fixed round trip to the model, for checking credentials and reachability.
    pub async fn smoke(&self) -> SummarizeResult<String> {
        let reply = self.gateway.invoke(&smoke_messages(), SMOKE_OPTIONS).await?;
        Ok(reply)
    }

    #[tracing::instrument(skip(self, document), fields(filename = %document.filename, bytes = document.data.len()))]
    pub async fn summarize(&self, document: Document) -> SummarizeResult<FinalSummary> {
        let start = Instant::now();
        let mut run = Run::new();

        match self.drive(&mut run, document).await {
            Ok(summary) => {
                tracing::info!(
                    sections = summary.section_count,
                    stages = run.history.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Contract summarized"
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(stage = %run.stage, error = %e, "Summarization failed");
                run.advance(Stage::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn drive(&self, run: &mut Run, document: Document) -> SummarizeResult<FinalSummary> {
        if document.data.is_empty() {
            return Err(SummarizeError::EmptyUpload);
        }

        let raw = self
            .extractor
            .extract(&document.data)
            .await
            .map_err(|e| SummarizeError::UnextractableDocument(e.to_string()))?;
        let text = normalize(&raw);
        if text.is_empty() {
            return Err(SummarizeError::UnextractableDocument(NO_TEXT_MESSAGE.to_string()));
        }
        run.advance(Stage::Extracted);

        let sections = split_sections(&text);
        if sections.is_empty() {
            return Err(SummarizeError::InternalError(
                "section splitter produced no sections".to_string(),
            ));
        }
        run.advance(Stage::Split);
        tracing::info!(sections = sections.len(), chars = text.len(), "Contract split");

        run.advance(Stage::Mapping);
        let section_summaries = self.map_sections(&sections).await?;

        run.advance(Stage::Reducing);
        let executive = self.reduce(&section_summaries).await?;

        let summary = FinalSummary::assemble(document.filename, executive, section_summaries);
        run.advance(Stage::Assembled);

        self.persist(&summary).await;
        run.advance(Stage::Persisted);
        run.advance(Stage::Done);

        Ok(summary)
    }

    /// Summaries come back in section order however the calls interleave,
    /// and only once every call has finished.
    async fn map_sections(&self, sections: &[Section]) -> SummarizeResult<Vec<SectionSummary>> {
        let calls: Vec<_> = sections
            .iter()
            .enumerate()
            .map(|(idx, section)| self.summarize_section(idx, section))
            .collect();

        let results: Vec<SummarizeResult<SectionSummary>> = stream::iter(calls)
            .buffered(self.map_concurrency)
            .collect()
            .await;

        results.into_iter().collect()
    }

    async fn summarize_section(&self, idx: usize, section: &Section) -> SummarizeResult<SectionSummary> {
        let title = section.display_title(idx);

        let raw = self
            .gateway
            .invoke(&section_messages(&section.content), SECTION_OPTIONS)
            .await?;
        let text = self.repairs.repair(&title, &clean(&raw));

        tracing::debug!(index = idx, title = %title, chars = text.len(), "Section summarized");

        Ok(SectionSummary { title, text })
    }

    async fn reduce(&self, section_summaries: &[SectionSummary]) -> SummarizeResult<String> {
        let blocks: Vec<String> = section_summaries.iter().map(SectionSummary::render).collect();

        let raw = self
            .gateway
            .invoke(&reducer_messages(&blocks), REDUCER_OPTIONS)
            .await?;

        Ok(clean(&raw))
    }

    /// Awaited inline, so the response waits on the write for at most
    /// `persist_timeout`. A failed or slow write is logged, never surfaced.
    async fn persist(&self, summary: &FinalSummary) {
        let Some(sink) = &self.sink else {
            return;
        };

        match tokio::time::timeout(self.persist_timeout, sink.save(&summary.filename, &summary.text)).await {
            Ok(Ok(id)) => tracing::debug!(id, "Summary persisted"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to persist summary"),
            Err(_) => tracing::warn!(
                timeout_ms = self.persist_timeout.as_millis() as u64,
                "Timed out persisting summary"
            ),
        }
    }
}
