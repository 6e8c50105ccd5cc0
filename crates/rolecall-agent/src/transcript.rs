// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown transcript export.

use rolecall_core::{ChatMessage, Role};

/// Default file name for an exported transcript.
pub const TRANSCRIPT_FILE_NAME: &str = "transcript_rg_telesales.md";

const TRANSCRIPT_HEADING: &str = "# Transcript - RG Telesales Role-Play";

/// Renders the conversation as Markdown, one paragraph per message.
pub fn to_markdown_transcript(messages: &[ChatMessage]) -> String {
    let mut blocks = vec![TRANSCRIPT_HEADING.to_string(), String::new()];
    blocks.extend(messages.iter().filter(|m| !m.synthetic).map(|m| {
        let who = match m.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        format!("**{who}:** {}", m.content)
    }));
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::OPENER_TRIGGER;

    #[test]
    fn renders_heading_and_paragraphs() {
        let messages = vec![
            ChatMessage::user("Selamat sore, Bu."),
            ChatMessage::assistant("Sore. Ada apa ya?"),
        ];
        assert_eq!(
            to_markdown_transcript(&messages),
            "# Transcript - RG Telesales Role-Play\n\n\n\n**User:** Selamat sore, Bu.\n\n**Assistant:** Sore. Ada apa ya?"
        );
    }

    #[test]
    fn triggers_are_left_out() {
        let messages = vec![
            ChatMessage::trigger(OPENER_TRIGGER),
            ChatMessage::assistant("Anak saya kelas 5."),
        ];
        let md = to_markdown_transcript(&messages);
        assert!(!md.contains(OPENER_TRIGGER));
        assert!(md.ends_with("**Assistant:** Anak saya kelas 5."));
    }

    #[test]
    fn empty_conversation_is_just_the_heading() {
        assert_eq!(
            to_markdown_transcript(&[]),
            "# Transcript - RG Telesales Role-Play\n\n"
        );
    }
}
