use std::sync::LazyLock;

use regex::Regex;

/// Narrator phrases models echo back; removed wherever they occur, ignoring case.
pub const META_PHRASES: &[&str] = &[
    "here is a summary",
    "here's a summary",
    "here is a clear and concise summary",
    "here's a clear and concise summary",
    "this section discusses",
    "the above text says",
    "in summary,",
    "to summarize,",
    "executive summary (150–220 words)",
    "executive summary (150-220 words)",
];

static META_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = META_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("meta phrases are escaped literals")
});

/// Reducer length hints such as "(150–220 words)".
static LENGTH_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*\d+\s*[–-]\s*\d+\s*words\s*\)").expect("valid length label pattern")
});

static SPACE_BEFORE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\n").expect("valid newline pattern"));

static HORIZONTAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").expect("valid whitespace pattern"));

/// Strip meta commentary and label artifacts from model output.
///
/// Removing a phrase can expose another match, so passes repeat until the
/// text settles; `clean(clean(s)) == clean(s)` for every input.
#[must_use]
pub fn clean(text: &str) -> String {
    let mut current = normalize_punctuation(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

fn clean_pass(text: &str) -> String {
    let out = SPACE_BEFORE_NEWLINE.replace_all(text, "\n");
    let out = META_PHRASE.replace_all(&out, "");
    let out = LENGTH_LABEL.replace_all(&out, "");
    let out = HORIZONTAL_RUN.replace_all(&out, " ");
    out.trim().to_string()
}
