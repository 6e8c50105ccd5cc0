// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history windowing for the `[HISTORY]` prompt section.

use rolecall_core::{ChatMessage, Intent, Role};

/// Number of trailing messages included in the prompt.
///
/// Openers get no history. Otherwise the window grows in steps with the
/// conversation length: 6 up to 6 messages, 8 up to 12, then 12.
pub fn history_window(message_count: usize, intent: Intent) -> usize {
    match intent {
        Intent::Opener => 0,
        Intent::Dialog if message_count <= 6 => 6,
        Intent::Dialog if message_count <= 12 => 8,
        Intent::Dialog => 12,
    }
}

/// Renders the last `window` messages as `User: ...` / `Assistant: ...` lines.
///
/// Synthetic messages are dropped after windowing.
pub fn history_lines(messages: &[ChatMessage], window: usize) -> Vec<String> {
    let start = messages.len().saturating_sub(window);
    messages[start..]
        .iter()
        .filter(|m| !m.synthetic)
        .map(|m| match m.role {
            Role::User => format!("User: {}", m.content),
            Role::Assistant => format!("Assistant: {}", m.content),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn window_steps() {
        assert_eq!(history_window(0, Intent::Dialog), 6);
        assert_eq!(history_window(6, Intent::Dialog), 6);
        assert_eq!(history_window(7, Intent::Dialog), 8);
        assert_eq!(history_window(12, Intent::Dialog), 8);
        assert_eq!(history_window(13, Intent::Dialog), 12);
        assert_eq!(history_window(200, Intent::Opener), 0);
    }

    #[test]
    fn lines_take_tail_and_skip_triggers() {
        let messages = vec![
            ChatMessage::user("satu"),
            ChatMessage::assistant("dua"),
            ChatMessage::trigger("⏩ OPENER"),
            ChatMessage::assistant("tiga"),
        ];
        let lines = history_lines(&messages, 3);
        assert_eq!(lines, vec!["Assistant: dua", "Assistant: tiga"]);
    }

    #[test]
    fn zero_window_is_empty() {
        let messages = vec![ChatMessage::user("halo")];
        assert!(history_lines(&messages, 0).is_empty());
    }

    proptest! {
        #[test]
        fn window_is_monotonic(n in 0usize..500) {
            prop_assert!(history_window(n, Intent::Dialog) <= history_window(n + 1, Intent::Dialog));
            prop_assert!([6, 8, 12].contains(&history_window(n, Intent::Dialog)));
        }

        #[test]
        fn lines_never_exceed_window(n in 0usize..40, window in 0usize..20) {
            let messages: Vec<_> = (0..n).map(|i| ChatMessage::user(i.to_string())).collect();
            let lines = history_lines(&messages, window);
            prop_assert_eq!(lines.len(), n.min(window));
            if let Some(last) = lines.last() {
                prop_assert_eq!(last.clone(), format!("User: {}", n - 1));
            }
        }
    }
}
