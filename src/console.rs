use tracing::info;

use crate::{
    client::ApiClient,
    dtos::responses::{ClearVotesResponseDTO, EventResponseDTO},
    error::ClientError,
    models::question::Question,
};

/// Host controls for one event.
#[derive(Clone)]
pub struct ControlConsole {
    client: ApiClient,
    event_id: String,
}

impl ControlConsole {
    pub fn new(client: ApiClient, event_id: impl Into<String>) -> Self {
        Self {
            client,
            event_id: event_id.into(),
        }
    }

    pub async fn questions(&self) -> Result<Vec<Question>, ClientError> {
        self.client.list_questions(&self.event_id).await
    }

    /// Opens `question_id` for voting, or closes voting with `None`.
    pub async fn set_current(
        &self,
        question_id: Option<&str>,
    ) -> Result<EventResponseDTO, ClientError> {
        let event = self
            .client
            .set_current_question(&self.event_id, question_id)
            .await?;
        info!(
            "Event {} now shows {:?}",
            self.event_id, event.current_question_id
        );
        Ok(event)
    }

    /// Opens the question after the current one, wrapping around.
    pub async fn next_question(&self) -> Result<EventResponseDTO, ClientError> {
        let event = self.client.get_event(&self.event_id).await?;
        let next = next_question_id(&event.questions, event.current_question_id.as_deref())
            .ok_or_else(|| ClientError::NotFound(format!("event {} has no questions", self.event_id)))?;
        self.set_current(Some(&next)).await
    }

    pub async fn clear_votes(&self, question_id: &str) -> Result<ClearVotesResponseDTO, ClientError> {
        let cleared = self.client.clear_votes(question_id).await?;
        info!("Cleared {} votes of {}", cleared.deleted, question_id);
        Ok(cleared)
    }
}

fn next_question_id(questions: &[Question], current: Option<&str>) -> Option<String> {
    let position = current.and_then(|id| questions.iter().position(|q| q.id == id));
    let next = match position {
        Some(index) => (index + 1) % questions.len(),
        None => 0,
    };
    questions.get(next).map(|q| q.id.clone())
}
