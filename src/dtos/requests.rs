use serde::{Deserialize, Serialize};

/// Body of `PUT /events/{event_id}/current-question`; `null` closes voting.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetCurrentQuestionDTO {
    pub question_id: Option<String>,
}

/// Body of `POST /votes`. Fields are optional here so a missing one is
/// reported as a vote error rather than a generic body rejection.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteDTO {
    pub question_id: Option<String>,
    pub option_id: Option<String>,
    pub device_id: Option<String>,
}
