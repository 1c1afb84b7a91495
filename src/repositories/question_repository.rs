use std::sync::Arc;

use crate::{config::storage::Storage, error::AppError, models::question::Question};

#[derive(Clone)]
pub struct QuestionRepository {
    storage: Arc<Storage>,
}

impl QuestionRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Questions of an event sorted by their `order` key.
    pub async fn questions_for_event(&self, event_id: &str) -> Result<Vec<Question>, AppError> {
        let mut questions: Vec<Question> = self
            .storage
            .questions
            .read_all()
            .await?
            .into_iter()
            .filter(|question| question.event_id == event_id)
            .collect();
        questions.sort_by_key(|question| question.order);
        Ok(questions)
    }

    pub async fn get_question(&self, question_id: &str) -> Result<Option<Question>, AppError> {
        let questions = self.storage.questions.read_all().await?;
        Ok(questions
            .into_iter()
            .find(|question| question.id == question_id))
    }
}
