use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{event::Event, question::Question, vote::Vote};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status: status as i32,
            message: message.into(),
            data: Some(data),
            timestamp: Utc::now(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseDTO {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
    pub current_question_id: Option<String>,
    pub cleared_question_id: Option<String>,
}

impl EventResponseDTO {
    pub fn new(event: Event, questions: Vec<Question>) -> Self {
        Self {
            id: event.id,
            name: event.name,
            questions,
            current_question_id: event.current_question_id,
            cleared_question_id: event.cleared_question_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClearedResponseDTO {
    pub cleared_question_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponseDTO {
    #[serde(flatten)]
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub updated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceVoteDTO {
    pub question_id: String,
    pub option_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClearVotesResponseDTO {
    pub question_id: String,
    pub deleted: usize,
}
