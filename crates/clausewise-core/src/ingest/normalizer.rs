use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+\n").expect("valid trailing space pattern"));

static HORIZONTAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").expect("valid whitespace pattern"));

/// Clean raw extracted text: strip trailing spaces, join hyphenated line
/// breaks, cap blank lines at one, squeeze horizontal whitespace and trim.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    // a join can expose another "-\n" or leave spaces before a newline
    loop {
        let next = TRAILING_SPACE.replace_all(&text, "\n").replace("-\n", "");
        if next == text {
            break;
        }
        text = next;
    }

    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = HORIZONTAL_RUN.replace_all(&text, " ");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_hyphenated_words() {
        assert_eq!(normalize("agree-\nment is binding"), "agreement is binding");
    }

    #[test]
    fn test_collapses_blank_lines() {
        let out = normalize("CLAUSE ONE\n\n\n\n\nCLAUSE TWO\n\nend");
        assert_eq!(out, "CLAUSE ONE\n\nCLAUSE TWO\n\nend");
    }

    #[test]
    fn test_whitespace_only_lines_count_as_blank() {
        assert_eq!(normalize("a\n \n \n \nb"), "a\n\nb");
        assert_eq!(normalize("a\t\n\u{a0}\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_squeezes_horizontal_whitespace() {
        assert_eq!(normalize("  The  Parties\t\tagree   \n"), "The Parties agree");
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(normalize("one\r\n\r\n\r\n\r\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t\n "), "");
    }

    #[test]
    fn test_output_invariants_and_idempotence() {
        let samples = [
            "a--\n\nb",
            "INTRODUCTION\n\n\n\nThe  parties -\n\n\n agree.\t \t",
            "x \n \n \n y",
            "word-\n-\nwrap   here\n\n\n\n\n",
            "\u{a0}\u{a0}non-breaking\u{a0} \u{a0}spaces",
            "a -\n\nb",
            "a\n \n \n \nb",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert!(!once.contains("\n\n\n"), "newline run in {once:?}");
            assert!(!TRAILING_SPACE.is_match(&once), "trailing space in {once:?}");
            assert!(!HORIZONTAL_RUN.is_match(&once), "space run in {once:?}");
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
