// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display sink that records what would have been shown.

use rolecall_agent::DisplaySink;

/// Sink event, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Render(String),
    Complete,
    Abandon,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<DisplayEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// Text of the last render before each `Complete`.
    pub fn completed_replies(&self) -> Vec<String> {
        let mut replies = Vec::new();
        let mut current: Option<&str> = None;
        for event in &self.events {
            match event {
                DisplayEvent::Render(text) => current = Some(text.as_str()),
                DisplayEvent::Abandon => current = None,
                DisplayEvent::Complete => {
                    replies.push(current.take().unwrap_or_default().to_string());
                }
            }
        }
        replies
    }

    pub fn abandon_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Abandon))
            .count()
    }
}

impl DisplaySink for RecordingSink {
    fn render(&mut self, text: &str) {
        self.events.push(DisplayEvent::Render(text.to_string()));
    }

    fn complete(&mut self) {
        self.events.push(DisplayEvent::Complete);
    }

    fn abandon(&mut self) {
        self.events.push(DisplayEvent::Abandon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_replies_skip_abandoned_attempts() {
        let mut sink = RecordingSink::new();
        sink.render("setengah");
        sink.abandon();
        sink.render("Iya");
        sink.render("Iya, betul.");
        sink.complete();
        assert_eq!(sink.completed_replies(), vec!["Iya, betul."]);
        assert_eq!(sink.abandon_count(), 1);
        assert_eq!(sink.events().len(), 5);
    }
}
