use std::sync::Arc;

use tracing::info;

use crate::{
    config::storage::Storage,
    error::{AppError, EventsError},
    models::event::Event,
};

#[derive(Clone)]
pub struct EventRepository {
    storage: Arc<Storage>,
}

impl EventRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        let events = self.storage.events.read_all().await?;
        Ok(events.into_iter().find(|event| event.id == event_id))
    }

    pub async fn set_current_question(
        &self,
        event_id: &str,
        question_id: Option<String>,
    ) -> Result<Event, AppError> {
        info!(
            "Setting current question of event {} to {:?}",
            event_id, question_id
        );
        self.modify(event_id, |event| event.current_question_id = question_id)
            .await
    }

    /// Arms the one-shot cleared flag; a later clear overwrites an
    /// unacknowledged earlier one.
    pub async fn arm_cleared(&self, event_id: &str, question_id: &str) -> Result<Event, AppError> {
        self.modify(event_id, |event| {
            event.cleared_question_id = Some(question_id.to_string())
        })
        .await
    }

    pub async fn acknowledge_cleared(&self, event_id: &str) -> Result<Event, AppError> {
        self.modify(event_id, |event| event.cleared_question_id = None)
            .await
    }

    async fn modify(
        &self,
        event_id: &str,
        change: impl FnOnce(&mut Event),
    ) -> Result<Event, AppError> {
        self.storage
            .events
            .update(|events| {
                let event = events.iter_mut().find(|event| event.id == event_id)?;
                change(event);
                Some(event.clone())
            })
            .await?
            .ok_or(AppError::Event(EventsError::EventNotFound))
    }
}
