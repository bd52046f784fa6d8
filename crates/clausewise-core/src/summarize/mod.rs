mod cleaner;
mod pipeline;
mod prompt;
mod repair;

pub use cleaner::{clean, META_PHRASES};
pub use pipeline::{
    Document, FinalSummary, SectionSummary, Stage, SummarizeError, SummarizeResult, Summarizer,
    NO_TEXT_MESSAGE,
};
pub use prompt::{
    reducer_messages, section_messages, smoke_messages, REDUCER_INSTRUCTION, REDUCER_OPTIONS,
    REDUCER_SYSTEM_PROMPT, SECTION_OPTIONS, SECTION_SYSTEM_PROMPT, SMOKE_OPTIONS,
    SMOKE_SYSTEM_PROMPT, SMOKE_USER_PROMPT,
};
pub use repair::{RepairRegistry, RepairRule};
