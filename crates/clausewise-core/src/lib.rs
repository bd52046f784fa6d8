pub mod error;
pub mod gateway;
pub mod ingest;
pub mod storage;
pub mod summarize;

pub use error::{Error, Result};
pub use gateway::{ChatMessage, GatewayConfig, GatewayError, HttpGateway, ModelGateway};
pub use ingest::{PdfTextExtractor, Section, TextExtractor};
pub use storage::{Storage, StoredSummary, SummarySink};
pub use summarize::{Document, FinalSummary, SummarizeError, Summarizer};
