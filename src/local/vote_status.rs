use std::sync::Arc;

use tracing::warn;

use super::store::KeyValueStore;

const KEY_PREFIX: &str = "live-vote:voted:";

/// Local "already voted" hint per question.
///
/// Advisory only: the server keeps one vote per (question, device) on its
/// own, this just lets the voting screen show the voted state without a
/// round trip. Every failure resolves toward allowing the vote.
#[derive(Clone)]
pub struct VoteStatusGuard {
    store: Arc<dyn KeyValueStore>,
}

impl VoteStatusGuard {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn check(&self, question_id: &str) -> bool {
        let Some(key) = storage_key(question_id) else {
            return false;
        };
        match self.store.get(&key) {
            Ok(value) => value.is_some(),
            Err(e) => {
                warn!("Vote status for {question_id} unreadable: {e}");
                false
            }
        }
    }

    pub fn mark(&self, question_id: &str) -> bool {
        let Some(key) = storage_key(question_id) else {
            return false;
        };
        match self.store.set(&key, "true") {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to mark {question_id} as voted: {e}");
                false
            }
        }
    }

    pub fn clear(&self, question_id: &str) {
        let Some(key) = storage_key(question_id) else {
            return;
        };
        if let Err(e) = self.store.remove(&key) {
            warn!("Failed to clear vote status for {question_id}: {e}");
        }
    }
}

fn storage_key(question_id: &str) -> Option<String> {
    let question_id = question_id.trim();
    (!question_id.is_empty()).then(|| format!("{KEY_PREFIX}{question_id}"))
}
