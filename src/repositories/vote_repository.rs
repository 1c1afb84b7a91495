use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{config::storage::Storage, error::AppError, models::vote::Vote};

#[derive(Clone)]
pub struct VoteRepository {
    storage: Arc<Storage>,
}

/// Outcome of casting a vote: the stored record and whether it replaced an
/// earlier choice of the same device.
#[derive(Debug)]
pub struct CastVote {
    pub vote: Vote,
    pub updated: bool,
}

impl VoteRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn votes_for_question(&self, question_id: &str) -> Result<Vec<Vote>, AppError> {
        let votes = self.storage.votes.read_all().await?;
        Ok(votes
            .into_iter()
            .filter(|vote| vote.question_id == question_id)
            .collect())
    }

    pub async fn votes_for_device(&self, device_id: &str) -> Result<Vec<Vote>, AppError> {
        let votes = self.storage.votes.read_all().await?;
        Ok(votes
            .into_iter()
            .filter(|vote| vote.device_id == device_id)
            .collect())
    }

    /// Creates the device's vote for the question, or moves the existing one
    /// to `option_id`.
    pub async fn cast_vote(
        &self,
        question_id: &str,
        option_id: &str,
        device_id: &str,
    ) -> Result<CastVote, AppError> {
        let cast = self
            .storage
            .votes
            .update(|votes| {
                let existing = votes
                    .iter_mut()
                    .find(|vote| vote.question_id == question_id && vote.device_id == device_id);

                match existing {
                    Some(vote) => {
                        vote.option_id = option_id.to_string();
                        vote.timestamp = Utc::now();
                        CastVote {
                            vote: vote.clone(),
                            updated: true,
                        }
                    }
                    None => {
                        let vote = Vote {
                            id: Uuid::new_v4().to_string(),
                            question_id: question_id.to_string(),
                            option_id: option_id.to_string(),
                            device_id: device_id.to_string(),
                            timestamp: Utc::now(),
                        };
                        votes.push(vote.clone());
                        CastVote {
                            vote,
                            updated: false,
                        }
                    }
                }
            })
            .await?;

        info!(
            "Vote {} on question {} -> {} (updated: {})",
            cast.vote.id, question_id, option_id, cast.updated
        );
        Ok(cast)
    }

    /// Deletes every vote of the question, returning how many were removed.
    pub async fn clear_votes(&self, question_id: &str) -> Result<usize, AppError> {
        let removed = self
            .storage
            .votes
            .update(|votes| {
                let before = votes.len();
                votes.retain(|vote| vote.question_id != question_id);
                before - votes.len()
            })
            .await?;

        info!("Cleared {} votes of question {}", removed, question_id);
        Ok(removed)
    }
}
