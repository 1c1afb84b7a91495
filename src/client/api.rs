use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    dtos::{
        requests::{CastVoteDTO, SetCurrentQuestionDTO},
        responses::{
            ApiResponse, ClearVotesResponseDTO, ClearedResponseDTO, DeviceVoteDTO,
            EventResponseDTO, VoteResponseDTO,
        },
    },
    error::ClientError,
    models::{question::Question, vote::Vote},
};

/// Typed client for the `/api` routes, shared by every front end.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:9000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn get_event(&self, event_id: &str) -> Result<EventResponseDTO, ClientError> {
        self.send(self.http.get(self.url(&format!("/events/{event_id}"))))
            .await
    }

    pub async fn current_question_id(&self, event_id: &str) -> Result<Option<String>, ClientError> {
        Ok(self.get_event(event_id).await?.current_question_id)
    }

    pub async fn list_questions(&self, event_id: &str) -> Result<Vec<Question>, ClientError> {
        self.send(
            self.http
                .get(self.url(&format!("/events/{event_id}/questions"))),
        )
        .await
    }

    pub async fn set_current_question(
        &self,
        event_id: &str,
        question_id: Option<&str>,
    ) -> Result<EventResponseDTO, ClientError> {
        let body = SetCurrentQuestionDTO {
            question_id: question_id.map(str::to_string),
        };
        self.send(
            self.http
                .put(self.url(&format!("/events/{event_id}/current-question")))
                .json(&body),
        )
        .await
    }

    pub async fn cleared_question_id(&self, event_id: &str) -> Result<Option<String>, ClientError> {
        let cleared: ClearedResponseDTO = self
            .send(self.http.get(self.url(&format!("/events/{event_id}/cleared"))))
            .await?;
        Ok(cleared.cleared_question_id)
    }

    pub async fn acknowledge_clear(&self, event_id: &str) -> Result<(), ClientError> {
        let _: ClearedResponseDTO = self
            .send(
                self.http
                    .post(self.url(&format!("/events/{event_id}/clear-notification"))),
            )
            .await?;
        Ok(())
    }

    pub async fn question_votes(&self, question_id: &str) -> Result<Vec<Vote>, ClientError> {
        self.send(
            self.http
                .get(self.url(&format!("/questions/{question_id}/votes"))),
        )
        .await
    }

    pub async fn cast_vote(
        &self,
        question_id: &str,
        option_id: &str,
        device_id: &str,
    ) -> Result<VoteResponseDTO, ClientError> {
        let body = CastVoteDTO {
            question_id: Some(question_id.to_string()),
            option_id: Some(option_id.to_string()),
            device_id: Some(device_id.to_string()),
        };
        self.send(self.http.post(self.url("/votes")).json(&body))
            .await
    }

    pub async fn clear_votes(&self, question_id: &str) -> Result<ClearVotesResponseDTO, ClientError> {
        self.send(
            self.http
                .delete(self.url(&format!("/questions/{question_id}/votes"))),
        )
        .await
    }

    pub async fn device_votes(&self, device_id: &str) -> Result<Vec<DeviceVoteDTO>, ClientError> {
        self.send(
            self.http
                .get(self.url(&format!("/devices/{device_id}/votes"))),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
                if e.is_decode() {
                    ClientError::Decode(e.to_string())
                } else {
                    ClientError::Network(e)
                }
            })?;
            return envelope
                .data
                .ok_or_else(|| ClientError::Decode(format!("{status} response without data")));
        }

        let body: Value = response.json().await.unwrap_or_else(|_| json!({}));
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
            .to_string();
        debug!("Request failed with {status}: {message}");

        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::InvalidInput(message)
            }
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }
}
