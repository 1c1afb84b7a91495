use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Storage Errors
    #[error("Storage error: {0}")]
    StorageError(String),

    // Event Errors
    #[error("Event error: {0}")]
    Event(#[from] EventsError),

    // Vote Errors
    #[error("Vote error: {0}")]
    Vote(#[from] VotesError),
}

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Event not found")]
    EventNotFound,

    #[error("Question not found")]
    QuestionNotFound,

    #[error("Question does not belong to this event")]
    QuestionNotInEvent,
}

#[derive(Error, Debug)]
pub enum VotesError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid vote option")]
    InvalidVoteOption,
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_string = self.to_string();
        let (status, error_message) = match self {
            // Storage Errors
            AppError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage Error"),

            // Event Errors
            AppError::Event(event_err) => match event_err {
                EventsError::EventNotFound => (StatusCode::NOT_FOUND, "Event Not Found"),
                EventsError::QuestionNotFound => (StatusCode::NOT_FOUND, "Question Not Found"),
                EventsError::QuestionNotInEvent => {
                    (StatusCode::NOT_FOUND, "Question Not Found In Event")
                }
            },

            // Vote Errors
            AppError::Vote(vote_err) => match vote_err {
                VotesError::MissingField(_) => (StatusCode::BAD_REQUEST, "Missing Vote Field"),
                VotesError::InvalidVoteOption => (StatusCode::BAD_REQUEST, "Invalid Vote Option"),
            },
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": error_message,
            "error": error_string,
            "timestamp": chrono::Utc::now()
        }));

        (status, body).into_response()
    }
}

/// Failures seen by the HTTP client side of the system.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rejected input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// How a client failure should be surfaced to the person at the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserInput,
    MissingEntity,
    Connectivity,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidInput(_) => ErrorKind::UserInput,
            ClientError::NotFound(_) => ErrorKind::MissingEntity,
            ClientError::Network(_) | ClientError::Server { .. } | ClientError::Decode(_) => {
                ErrorKind::Connectivity
            }
        }
    }
}
