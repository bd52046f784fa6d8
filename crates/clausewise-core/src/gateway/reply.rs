use serde_json::Value;

/// The reply shapes a chat endpoint (or a wrapper around one) is known to
/// produce, discriminated once at the gateway boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A bare JSON string.
    PlainText(String),
    /// `{"content": "..."}`
    DirectContent(String),
    /// `{"choices": [{"message": {"content": "..."}}]}`
    ChoiceMessage(String),
    /// `{"choices": [{"text": "..."}]}`
    ChoiceText(String),
    Unrecognized(Value),
}

impl ModelReply {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return match value {
                Value::String(text) => Self::PlainText(text),
                other => Self::Unrecognized(other),
            };
        };

        if let Some(Value::String(text)) = map.get("content") {
            return Self::DirectContent(text.clone());
        }

        if let Some(first) = map
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        {
            if let Some(text) = first
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(Value::as_str)
            {
                return Self::ChoiceMessage(text.to_string());
            }
            if let Some(text) = first.get("text").and_then(Value::as_str) {
                return Self::ChoiceText(text.to_string());
            }
        }

        Self::Unrecognized(value)
    }

    /// Unrecognized replies fall back to their compact JSON serialization.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::PlainText(text)
            | Self::DirectContent(text)
            | Self::ChoiceMessage(text)
            | Self::ChoiceText(text) => text,
            Self::Unrecognized(value) => value.to_string(),
        }
    }
}
