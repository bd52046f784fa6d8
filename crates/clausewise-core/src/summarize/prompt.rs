use crate::gateway::{ChatMessage, CompletionOptions};

pub const SECTION_SYSTEM_PROMPT: &str = "You are a legal expert. Summarize the following contract section clearly and concisely. \
Do NOT include meta phrases like 'here is a summary'. Use bullets only when helpful.";

pub const REDUCER_SYSTEM_PROMPT: &str = "You are a senior legal analyst and excellent writer.";

pub const REDUCER_INSTRUCTION: &str = "Create a professional Executive Summary (~180 words) of the contract from the following section summaries. \
If present, mention the introductory purpose (clarity, professionalism, respect) and any flexibility in Duration \
(extension or early termination by mutual written consent). Do not invent facts. No meta language.";

pub const SMOKE_SYSTEM_PROMPT: &str = "You are a maths friendly tutor who is eager to help.";
pub const SMOKE_USER_PROMPT: &str = "What is 1 + 1?";

pub const SECTION_OPTIONS: CompletionOptions = CompletionOptions::new(0.1, 320);
pub const REDUCER_OPTIONS: CompletionOptions = CompletionOptions::new(0.1, 380);
pub const SMOKE_OPTIONS: CompletionOptions = CompletionOptions::new(0.0, 20);

pub fn section_messages(section_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SECTION_SYSTEM_PROMPT),
        ChatMessage::user(section_text),
    ]
}

/// `section_blocks` are the rendered `### title` blocks, in document order.
pub fn reducer_messages(section_blocks: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(REDUCER_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "{REDUCER_INSTRUCTION}\n\n{}",
            section_blocks.join("\n\n")
        )),
    ]
}

pub fn smoke_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SMOKE_SYSTEM_PROMPT),
        ChatMessage::user(SMOKE_USER_PROMPT),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Role;

    #[test]
    fn test_reducer_message_layout() {
        let blocks = vec!["### 1. Duration\nTwelve months.".to_string(), "### 5. Liability\nCapped.".to_string()];

        let messages = reducer_messages(&blocks);

        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[1].content,
            format!("{REDUCER_INSTRUCTION}\n\n### 1. Duration\nTwelve months.\n\n### 5. Liability\nCapped.")
        );
    }

    #[test]
    fn test_section_message_carries_body_verbatim() {
        let messages = section_messages("1. Duration\nThe term is 12 months.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "1. Duration\nThe term is 12 months.");
    }
}
