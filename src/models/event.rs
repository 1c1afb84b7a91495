use serde::{Deserialize, Serialize};

/// A voting session as persisted in `events.json`.
///
/// Questions live in their own file and reference the event through
/// `Question::event_id`; the API embeds them when serving an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Question currently open for voting
    #[serde(default)]
    pub current_question_id: Option<String>,
    /// One-shot flag armed when a question's votes are cleared, reset by the
    /// first reader that acknowledges it
    #[serde(default)]
    pub cleared_question_id: Option<String>,
}
