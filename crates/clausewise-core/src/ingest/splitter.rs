use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Target chunk size, in bytes, when a document has no recognizable headings.
pub const SOFT_CHUNK_SIZE: usize = 3500;

/// A contiguous block of contract text, the unit of per-section summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: Option<String>,
    pub content: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Section {
    /// `content` is the trimmed block; the offsets delimit the untrimmed span
    /// in the source text.
    #[must_use]
    pub fn new(content: String, start_offset: usize, end_offset: usize) -> Self {
        let title = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(String::from);

        Self {
            title,
            content,
            start_offset,
            end_offset,
        }
    }

    /// First non-blank line, or `Section N` (1-based) for a block without one.
    #[must_use]
    pub fn display_title(&self, index: usize) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Section {}", index + 1))
    }
}

/// One way of recognizing a line as the start of a contract section.
pub struct HeadingRule {
    pub name: &'static str,
    pattern: Regex,
}

impl HeadingRule {
    /// `body` must match the entire line; surrounding whitespace and letter
    /// case are ignored.
    pub fn new(name: &'static str, body: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(&format!(r"(?i)^\s*(?:{body})\s*$"))?,
        })
    }

    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

impl std::fmt::Debug for HeadingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadingRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

pub static HEADING_RULES: LazyLock<Vec<HeadingRule>> = LazyLock::new(|| {
    [
        ("introduction", "INTRODUCTION"),
        ("numbered", r"\d{1,2}\.\s+[A-Z][A-Za-z &/\-]+"),
        ("conclusion", "CONCLUSION(?: AND ACCEPTANCE)?"),
        ("witness", "IN WITNESS WHEREOF"),
    ]
    .into_iter()
    .filter_map(|(name, body)| match HeadingRule::new(name, body) {
        Ok(rule) => Some(rule),
        Err(e) => {
            tracing::error!(rule = name, error = %e, "Invalid heading rule");
            None
        }
    })
    .collect()
});

#[must_use]
pub fn is_heading(line: &str) -> bool {
    HEADING_RULES.iter().any(|rule| rule.matches(line))
}

/// Split normalized contract text into sections using the default heading rules.
#[must_use]
pub fn split_sections(text: &str) -> Vec<Section> {
    split_sections_with(text, &HEADING_RULES, SOFT_CHUNK_SIZE)
}

/// Each heading line opens a section that runs until the next heading. Text
/// before the first heading is dropped. Without any heading the text is soft
/// chunked instead.
#[must_use]
pub fn split_sections_with(text: &str, rules: &[HeadingRule], chunk_size: usize) -> Vec<Section> {
    let mut starts = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if rules.iter().any(|rule| rule.matches(bare)) {
            starts.push(offset);
        }
        offset += line.len();
    }

    if starts.is_empty() {
        tracing::debug!(chunk_size, "No headings found, falling back to soft chunks");
        return soft_chunks(text, chunk_size);
    }

    let mut sections = Vec::with_capacity(starts.len());
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(text.len());
        let block = text[start..end].trim();
        if !block.is_empty() {
            sections.push(Section::new(block.to_string(), start, end));
        }
    }

    tracing::debug!(
        headings = starts.len(),
        sections = sections.len(),
        preamble_bytes = starts[0],
        "Split text by headings"
    );

    sections
}

/// Size-bounded chunking that prefers to end a chunk on a sentence. A ". "
/// boundary is used only when it falls at least 60% of the way into the
/// window; otherwise the window is cut hard.
#[must_use]
pub fn soft_chunks(text: &str, chunk_size: usize) -> Vec<Section> {
    let chunk_size = chunk_size.max(1);
    let min_boundary = chunk_size * 3 / 5;
    let len = text.len();

    let mut chunks = Vec::new();
    let mut i = 0;

    while i < len {
        let j = char_floor(text, i, (i + chunk_size).min(len));

        let cut = match text[i..j].rfind(". ") {
            Some(pos) if pos >= min_boundary => i + pos + 1,
            _ => j,
        };

        let chunk = text[i..cut].trim();
        if !chunk.is_empty() {
            chunks.push(Section::new(chunk.to_string(), i, cut));
        }
        i = cut;
    }

    chunks
}

/// Largest char boundary at or below `target`, unless that would not move
/// past `start`, in which case the next boundary above it.
fn char_floor(text: &str, start: usize, target: usize) -> usize {
    let mut j = target;
    while !text.is_char_boundary(j) {
        j -= 1;
    }
    if j > start {
        return j;
    }

    j = target;
    while !text.is_char_boundary(j) {
        j += 1;
    }
    j
}
