// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The role-play engine: one [`ChatSession`] plus the provider and store
//! that serve it.
//!
//! Every change to the message list is followed by an autosave when a store
//! is attached. Save failures are logged and do not interrupt the
//! conversation; the history stays in memory.

use std::sync::Arc;

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rolecall_config::RolecallConfig;
use rolecall_core::{
    Audience, ConversationStore, ConversationSummary, Intent, ProviderAdapter, ProviderRequest,
    RolecallError, Segment,
};
use rolecall_persona::{
    PromptTask, build_prompt, greeting_reply, is_minimal_greeting, sample_scenario, system_prompt,
};
use tracing::{debug, info, warn};

use crate::batcher::{BatchPolicy, DisplaySink};
use crate::fallback::{ReplySource, generate_with_fallback};
use crate::session::ChatSession;
use crate::transcript::to_markdown_transcript;

/// A reply appended to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
    pub canned: bool,
}

pub struct RoleplayEngine {
    config: RolecallConfig,
    provider: Arc<dyn ProviderAdapter>,
    store: Option<Arc<dyn ConversationStore>>,
    session: ChatSession,
    rng: StdRng,
}

impl RoleplayEngine {
    pub fn new(
        config: RolecallConfig,
        provider: Arc<dyn ProviderAdapter>,
        store: Option<Arc<dyn ConversationStore>>,
    ) -> Self {
        let session = ChatSession::new(config.persona.audience, config.persona.segment);
        Self {
            config,
            provider,
            store,
            session,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source used for scenarios and canned greetings.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn config(&self) -> &RolecallConfig {
        &self.config
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn set_audience(&mut self, audience: Audience) {
        self.session.set_audience(audience);
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.session.set_segment(segment);
    }

    /// Appends a salesperson message and produces the customer's reply.
    pub async fn submit_user(
        &mut self,
        text: &str,
        sink: &mut dyn DisplaySink,
    ) -> Result<Option<Reply>, RolecallError> {
        self.session.push_user(text);
        self.autosave_logged().await;
        self.respond(sink).await
    }

    /// Asks the model to open the conversation as `audience`.
    pub async fn trigger_opener(
        &mut self,
        audience: Audience,
        sink: &mut dyn DisplaySink,
    ) -> Result<Option<Reply>, RolecallError> {
        self.session.trigger_opener(audience, &mut self.rng);
        info!(
            audience = %audience,
            segment = %self.session.segment(),
            scenario = self.session.scenario().unwrap_or_default(),
            "opener requested"
        );
        self.autosave_logged().await;
        self.respond(sink).await
    }

    /// Produces a reply if the last message is an unanswered user message.
    pub async fn respond(
        &mut self,
        sink: &mut dyn DisplaySink,
    ) -> Result<Option<Reply>, RolecallError> {
        if !self.session.needs_reply() {
            return Ok(None);
        }

        let greeting = self.session.intent() != Intent::Opener
            && self
                .session
                .pending_user_text()
                .is_some_and(is_minimal_greeting);

        let reply = if greeting {
            let text = greeting_reply(&mut self.rng).to_string();
            debug!(reply = %text, "answered bare greeting locally");
            sink.render(&text);
            Reply {
                text,
                source: ReplySource::Completed,
                canned: true,
            }
        } else {
            let request = self.build_request();
            let models = self.config.gemini.candidate_models();
            let generated = generate_with_fallback(
                self.provider.as_ref(),
                &models,
                &request,
                BatchPolicy::from(&self.config.display),
                sink,
            )
            .await;
            Reply {
                text: generated.text,
                source: generated.source,
                canned: false,
            }
        };
        sink.complete();

        self.session.record_reply(reply.text.clone());
        self.autosave_logged().await;
        Ok(Some(reply))
    }

    fn build_request(&mut self) -> ProviderRequest {
        let persona = self.session.bot_persona();
        let segment = self.session.segment();
        let opener = self.session.intent() == Intent::Opener;

        let scenario = match self.session.scenario() {
            Some(s) => s.to_string(),
            None => sample_scenario(persona, segment, &mut self.rng).to_string(),
        };
        let task = if opener {
            PromptTask::Opener {
                scenario: &scenario,
            }
        } else {
            PromptTask::Dialog
        };

        ProviderRequest {
            model: String::new(),
            prompt: build_prompt(self.session.messages(), persona, segment, task, Local::now()),
            system_instruction: Some(system_prompt(persona, segment)),
            generation: self.config.generation.params(opener),
            safety_settings: self.config.generation.safety_settings(),
        }
    }

    /// Saves the current conversation. Returns its id, or `None` when there
    /// is no store or nothing to save yet.
    pub async fn autosave(&mut self) -> Result<Option<String>, RolecallError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let id = self
            .session
            .conversation_id()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        let Some(conversation) = self.session.to_conversation(&id, Local::now()) else {
            return Ok(None);
        };

        store.save_conversation(&conversation).await?;
        debug!(id = %id, messages = conversation.messages.len(), "conversation saved");
        self.session.set_identity(id.clone(), conversation.title);
        Ok(Some(id))
    }

    async fn autosave_logged(&mut self) {
        if let Err(e) = self.autosave().await {
            warn!(error = %e, "autosave failed, history kept in memory only");
        }
    }

    /// Saved conversations, most recent first.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, RolecallError> {
        match &self.store {
            Some(store) => store.list_conversations().await,
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the session with a saved conversation.
    pub async fn open_conversation(&mut self, id: &str) -> Result<(), RolecallError> {
        let store = self.store.as_ref().ok_or_else(|| {
            RolecallError::Config("conversation history is disabled".to_string())
        })?;
        let conversation = store
            .get_conversation(id)
            .await?
            .ok_or_else(|| RolecallError::ConversationNotFound { id: id.to_string() })?;
        info!(id = %id, messages = conversation.messages.len(), "conversation loaded");
        self.session = ChatSession::from_conversation(conversation);
        Ok(())
    }

    /// Deletes a saved conversation. Deleting the open one detaches the
    /// session, so the next save creates a new row.
    pub async fn delete_conversation(&mut self, id: &str) -> Result<bool, RolecallError> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let removed = store.delete_conversation(id).await?;
        if self.session.conversation_id() == Some(id) {
            self.session.clear_identity();
        }
        Ok(removed)
    }

    pub fn new_session(&mut self) {
        self.session.reset();
    }

    pub fn export_markdown(&self) -> String {
        to_markdown_transcript(self.session.messages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::NullSink;
    use rolecall_core::Role;
    use rolecall_test_utils::{MockProvider, Script};

    fn engine_with(provider: MockProvider) -> (RoleplayEngine, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let mut config = RolecallConfig::default();
        config.gemini.model = "m1".into();
        config.gemini.fallback_models = vec!["m2".into()];
        let engine = RoleplayEngine::new(config, provider.clone(), None)
            .with_rng(StdRng::seed_from_u64(11));
        (engine, provider)
    }

    #[tokio::test]
    async fn greeting_is_answered_without_model() {
        let (mut engine, provider) = engine_with(MockProvider::new());
        let reply = engine
            .submit_user("Halo", &mut NullSink)
            .await
            .unwrap()
            .unwrap();
        assert!(reply.canned);
        assert!(rolecall_persona::GREETING_REPLIES.contains(&reply.text.as_str()));
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn dialog_uses_dialog_temperature_and_persona() {
        let (mut engine, provider) =
            engine_with(MockProvider::new().script("m1", Script::text("Iya, kenapa ya?")));
        engine.set_audience(Audience::Student);
        engine.set_segment(Segment::Sd);
        let reply = engine
            .submit_user("Dik, nilai matematikanya bagaimana?", &mut NullSink)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.text, "Iya, kenapa ya?");

        let call = &provider.calls().await[0];
        assert_eq!(call.request.generation.temperature, 0.3);
        assert!(call.request.prompt.contains("\"mode\":\"dialog\""));
        assert!(
            call.request
                .system_instruction
                .as_deref()
                .unwrap()
                .starts_with("Peran: Anda Murid segmen SD.")
        );
    }

    #[tokio::test]
    async fn opener_uses_opener_temperature_and_resets_intent() {
        let (mut engine, provider) =
            engine_with(MockProvider::new().script("m1", Script::text("Anak saya susah fokus.")));
        let reply = engine
            .trigger_opener(Audience::Parent, &mut NullSink)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.text, "Anak saya susah fokus.");
        assert_eq!(engine.session().intent(), Intent::Dialog);

        let call = &provider.calls().await[0];
        assert_eq!(call.request.generation.temperature, 0.35);
        assert!(call.request.prompt.contains("Gunakan skenario:"));
        assert!(!call.request.prompt.contains("OPENER"));
    }

    #[tokio::test]
    async fn greeting_during_opener_goes_to_model() {
        let (mut engine, provider) =
            engine_with(MockProvider::new().script("m1", Script::text("Pagi, saya mau tanya.")));
        engine.session.trigger_opener(Audience::Parent, &mut StdRng::seed_from_u64(1));
        engine.session.push_user("Halo");
        let reply = engine.respond(&mut NullSink).await.unwrap().unwrap();
        assert!(!reply.canned);
        assert_eq!(provider.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn no_reply_when_suppressed() {
        let (mut engine, provider) = engine_with(MockProvider::new());
        engine.new_session();
        assert!(engine.respond(&mut NullSink).await.unwrap().is_none());
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn export_skips_trigger() {
        let (mut engine, _provider) =
            engine_with(MockProvider::new().script("m1", Script::text("Saya murid SMP.")));
        engine.trigger_opener(Audience::Student, &mut NullSink).await.unwrap();
        let md = engine.export_markdown();
        assert!(!md.contains("OPENER"));
        assert!(md.contains("**Assistant:** Saya murid SMP."));
        assert_eq!(engine.session().messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn without_store_autosave_is_noop() {
        let (mut engine, _provider) = engine_with(MockProvider::new());
        engine.session.push_user("Permisi");
        assert_eq!(engine.autosave().await.unwrap(), None);
        assert!(engine.list_conversations().await.unwrap().is_empty());
        assert!(!engine.delete_conversation("x").await.unwrap());
        assert!(engine.open_conversation("x").await.is_err());
    }
}
