mod extractor;
mod normalizer;
mod splitter;

pub use extractor::{ExtractionError, ExtractionResult, PdfTextExtractor, TextExtractor};
pub use normalizer::normalize;
pub use splitter::{
    is_heading, soft_chunks, split_sections, split_sections_with, HeadingRule, Section, HEADING_RULES,
    SOFT_CHUNK_SIZE,
};
