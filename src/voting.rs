use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tracing::{info, warn};

use crate::{
    client::ApiClient,
    dtos::responses::VoteResponseDTO,
    error::ClientError,
    local::{device::device_id, store::KeyValueStore, vote_status::VoteStatusGuard},
    sync::{
        channels::{current_question_channel, subscribe_clear_notifications},
        Subscription,
    },
};

/// One attendee's device: its identity, its local voted flags and its
/// last known choice per question.
#[derive(Clone)]
pub struct VotingSession {
    client: ApiClient,
    event_id: String,
    device_id: String,
    guard: VoteStatusGuard,
    choices: Arc<Mutex<HashMap<String, String>>>,
}

impl VotingSession {
    pub fn new(client: ApiClient, event_id: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let device_id = device_id(store.as_ref());
        Self {
            client,
            event_id: event_id.into(),
            device_id,
            guard: VoteStatusGuard::new(store),
            choices: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Restores a returning voter's earlier choices from the server.
    pub async fn hydrate(&self) -> Result<usize, ClientError> {
        let votes = self.client.device_votes(&self.device_id).await?;
        let mut choices = self.choices.lock().unwrap_or_else(PoisonError::into_inner);
        for vote in &votes {
            self.guard.mark(&vote.question_id);
            choices.insert(vote.question_id.clone(), vote.option_id.clone());
        }
        info!("Restored {} earlier votes of device {}", votes.len(), self.device_id);
        Ok(votes.len())
    }

    pub fn has_voted(&self, question_id: &str) -> bool {
        self.guard.check(question_id)
    }

    pub fn choice(&self, question_id: &str) -> Option<String> {
        self.choices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(question_id)
            .cloned()
    }

    /// Sends the vote; voting again on the same question changes the choice.
    pub async fn vote(
        &self,
        question_id: &str,
        option_id: &str,
    ) -> Result<VoteResponseDTO, ClientError> {
        if question_id.trim().is_empty() || option_id.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "a question and an option are required".to_string(),
            ));
        }

        let cast = self
            .client
            .cast_vote(question_id, option_id, &self.device_id)
            .await?;

        if !self.guard.mark(question_id) {
            warn!("Vote on {question_id} accepted but not remembered locally");
        }
        self.choices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(question_id.to_string(), option_id.to_string());
        Ok(cast)
    }

    /// Forgets the local vote state of questions the host clears, so the
    /// screen offers voting again.
    pub fn watch_clears<C>(&self, interval: Duration, mut on_cleared: C) -> Subscription
    where
        C: FnMut(String) + Send + 'static,
    {
        let guard = self.guard.clone();
        let choices = self.choices.clone();
        subscribe_clear_notifications(
            self.client.clone(),
            self.event_id.clone(),
            interval,
            move |question_id| {
                guard.clear(&question_id);
                choices
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&question_id);
                on_cleared(question_id);
            },
        )
    }

    pub fn follow_current_question<C>(&self, interval: Duration, on_change: C) -> Subscription
    where
        C: FnMut(Option<String>) + Send + 'static,
    {
        current_question_channel(self.client.clone(), self.event_id.clone(), interval)
            .subscribe(on_change)
    }
}
