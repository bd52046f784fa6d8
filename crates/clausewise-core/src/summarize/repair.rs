use regex::Regex;

/// Completes a summary that a model is known to cut short for a given kind
/// of section.
pub struct RepairRule {
    pub name: &'static str,
    title: Regex,
    suffix: Regex,
    completion: String,
}

impl RepairRule {
    /// Both patterns are case-insensitive. `suffix` is anchored to the end of
    /// the text, after trailing whitespace.
    pub fn new(
        name: &'static str,
        title_pattern: &str,
        suffix_pattern: &str,
        completion: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            title: Regex::new(&format!("(?i){title_pattern}"))?,
            suffix: Regex::new(&format!(r"(?i)(?:{suffix_pattern})\s*$"))?,
            completion: completion.into(),
        })
    }

    #[must_use]
    pub fn applies(&self, title: &str, text: &str) -> bool {
        self.title.is_match(title) && self.suffix.is_match(text)
    }
}

impl std::fmt::Debug for RepairRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairRule")
            .field("name", &self.name)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

/// Ordered set of repair rules; the first rule that applies wins.
#[derive(Debug, Default)]
pub struct RepairRegistry {
    rules: Vec<RepairRule>,
}

impl RepairRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: RepairRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn add_rule(&mut self, rule: RepairRule) {
        self.rules.push(rule);
    }

    /// Registry holding the built-in truncation fixes.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        match RepairRule::new("liability-own-free-will", "liability", "own free will and", " risk.") {
            Ok(rule) => registry.add_rule(rule),
            Err(e) => tracing::error!(error = %e, "Invalid built-in repair rule"),
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn repair(&self, title: &str, text: &str) -> String {
        match self.rules.iter().find(|rule| rule.applies(title, text)) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, title, "Repairing truncated summary");
                format!("{}{}", text.trim_end(), rule.completion)
            }
            None => text.to_string(),
        }
    }
}
