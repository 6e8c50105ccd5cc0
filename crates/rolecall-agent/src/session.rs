// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory state of the conversation being practised.
//!
//! The message list is append-only while a conversation is open; it is only
//! replaced wholesale by [`ChatSession::reset`] or by loading a saved
//! conversation.

use chrono::{DateTime, Local};
use rand::Rng;
use rolecall_core::{Audience, ChatMessage, Conversation, Intent, Role, Segment};
use rolecall_persona::sample_scenario;

/// Content of the synthetic message that asks the model for an opener.
pub const OPENER_TRIGGER: &str = "⏩ OPENER";

/// Longest derived title, in characters.
const MAX_TITLE_CHARS: usize = 80;

/// State of one role-play conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    audience: Audience,
    segment: Segment,
    bot_persona: Audience,
    messages: Vec<ChatMessage>,
    suppress_next_reply: bool,
    intent: Intent,
    scenario: Option<String>,
    conversation_id: Option<String>,
    title: Option<String>,
}

impl ChatSession {
    pub fn new(audience: Audience, segment: Segment) -> Self {
        Self {
            audience,
            segment,
            bot_persona: audience,
            messages: Vec::new(),
            suppress_next_reply: false,
            intent: Intent::Dialog,
            scenario: None,
            conversation_id: None,
            title: None,
        }
    }

    /// Restores a saved conversation. No reply is generated until the user
    /// sends something new.
    pub fn from_conversation(conversation: Conversation) -> Self {
        let title = if conversation.title.trim().is_empty() {
            derive_title(&conversation.messages, Local::now())
        } else {
            conversation.title
        };
        Self {
            audience: conversation.audience,
            segment: conversation.segment,
            bot_persona: conversation.audience,
            messages: conversation.messages,
            suppress_next_reply: true,
            intent: Intent::Dialog,
            scenario: None,
            conversation_id: Some(conversation.id),
            title: Some(title),
        }
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Audience the model is currently playing.
    pub fn bot_persona(&self) -> Audience {
        self.bot_persona
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    /// Every message, synthetic triggers included.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn replies_suppressed(&self) -> bool {
        self.suppress_next_reply
    }

    /// Changes the persona; the model plays the new audience from the next turn.
    pub fn set_audience(&mut self, audience: Audience) {
        self.audience = audience;
        self.bot_persona = audience;
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.segment = segment;
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
        self.suppress_next_reply = false;
    }

    /// Queues an opener turn played by `audience`.
    pub fn trigger_opener<R: Rng + ?Sized>(&mut self, audience: Audience, rng: &mut R) {
        self.bot_persona = audience;
        self.scenario = Some(sample_scenario(audience, self.segment, rng).to_string());
        self.intent = Intent::Opener;
        self.messages.push(ChatMessage::trigger(OPENER_TRIGGER));
        self.suppress_next_reply = false;
    }

    pub fn needs_reply(&self) -> bool {
        !self.suppress_next_reply
            && self
                .messages
                .last()
                .is_some_and(|m| m.role == Role::User)
    }

    /// Content of the last message if it came from the user.
    pub fn pending_user_text(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Appends the model's reply and closes an opener turn.
    pub fn record_reply(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
        if self.intent == Intent::Opener {
            self.intent = Intent::Dialog;
            self.scenario = None;
        }
    }

    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| !m.synthetic)
    }

    /// Messages as they are persisted: synthetic triggers removed.
    pub fn pruned_messages(&self) -> Vec<ChatMessage> {
        self.visible_messages().cloned().collect()
    }

    /// Starts over with an empty history. Persona selection is kept.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.intent = Intent::Dialog;
        self.scenario = None;
        self.conversation_id = None;
        self.title = None;
        self.suppress_next_reply = true;
    }

    /// Records the id and title a save assigned.
    pub fn set_identity(&mut self, id: String, title: String) {
        self.conversation_id = Some(id);
        self.title = Some(title);
    }

    /// Detaches the session from its stored row; the next save creates a new one.
    pub fn clear_identity(&mut self) {
        self.conversation_id = None;
        self.title = None;
        self.scenario = None;
    }

    /// Snapshot for persistence, or `None` if there is nothing to save.
    ///
    /// `created_at` is set to `now`; the store keeps the original value on
    /// update.
    pub fn to_conversation(&self, id: &str, now: DateTime<Local>) -> Option<Conversation> {
        let messages = self.pruned_messages();
        if messages.is_empty() {
            return None;
        }
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| derive_title(&messages, now));
        let stamp = timestamp(now);
        Some(Conversation {
            id: id.to_string(),
            title,
            audience: self.audience,
            segment: self.segment,
            created_at: stamp.clone(),
            updated_at: stamp,
            messages,
        })
    }
}

/// Title from the first line of the first user message.
pub fn derive_title(messages: &[ChatMessage], now: DateTime<Local>) -> String {
    match messages.iter().find(|m| m.role == Role::User && !m.synthetic) {
        Some(first) => {
            let line = first.content.trim().lines().next().unwrap_or("");
            let title: String = line.chars().take(MAX_TITLE_CHARS).collect();
            if title.is_empty() {
                "Percakapan".to_string()
            } else {
                title
            }
        }
        None => format!("Chat {}", now.format("%Y-%m-%d %H:%M")),
    }
}

/// Local time to the second, as stored in the database.
pub fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S").to_string()
}
