use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    config::storage::Storage,
    dtos::{
        requests::CastVoteDTO,
        responses::{ApiResponse, ClearVotesResponseDTO, DeviceVoteDTO, VoteResponseDTO},
    },
    error::{AppError, EventsError, VotesError},
    models::vote::Vote,
    repositories::{
        event_repository::EventRepository, question_repository::QuestionRepository,
        vote_repository::VoteRepository,
    },
};

//*GET:: api/questions/question_id/votes
pub async fn get_question_votes(
    Extension(storage): Extension<Arc<Storage>>,
    Path(question_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Vote>>>, AppError> {
    QuestionRepository::new(storage.clone())
        .get_question(&question_id)
        .await?
        .ok_or(AppError::Event(EventsError::QuestionNotFound))?;

    let votes = VoteRepository::new(storage)
        .votes_for_question(&question_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Votes retrieved successfully",
        votes,
    )))
}

//?POST:: api/votes
pub async fn cast_vote(
    Extension(storage): Extension<Arc<Storage>>,
    Json(payload): Json<CastVoteDTO>,
) -> Result<(StatusCode, Json<ApiResponse<VoteResponseDTO>>), AppError> {
    let question_id = required(payload.question_id, "questionId")?;
    let option_id = required(payload.option_id, "optionId")?;
    let device_id = required(payload.device_id, "deviceId")?;

    let question = QuestionRepository::new(storage.clone())
        .get_question(&question_id)
        .await?
        .ok_or(AppError::Event(EventsError::QuestionNotFound))?;
    if !question.has_option(&option_id) {
        return Err(AppError::Vote(VotesError::InvalidVoteOption));
    }

    let cast = VoteRepository::new(storage)
        .cast_vote(&question_id, &option_id, &device_id)
        .await?;

    let (status, message) = if cast.updated {
        (StatusCode::OK, "Vote updated successfully")
    } else {
        (StatusCode::CREATED, "Vote cast successfully")
    };

    Ok((
        status,
        Json(ApiResponse::ok(
            status.as_u16(),
            message,
            VoteResponseDTO {
                vote: cast.vote,
                updated: cast.updated,
            },
        )),
    ))
}

//-DELETE:: api/questions/question_id/votes
pub async fn clear_question_votes(
    Extension(storage): Extension<Arc<Storage>>,
    Path(question_id): Path<String>,
) -> Result<Json<ApiResponse<ClearVotesResponseDTO>>, AppError> {
    let question = QuestionRepository::new(storage.clone())
        .get_question(&question_id)
        .await?
        .ok_or(AppError::Event(EventsError::QuestionNotFound))?;

    // resolve the owning event up front so a 404 leaves the votes in place
    let event_repository = EventRepository::new(storage.clone());
    event_repository
        .get_event(&question.event_id)
        .await?
        .ok_or(AppError::Event(EventsError::EventNotFound))?;

    let deleted = VoteRepository::new(storage)
        .clear_votes(&question_id)
        .await?;
    event_repository
        .arm_cleared(&question.event_id, &question_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Votes cleared successfully",
        ClearVotesResponseDTO {
            question_id,
            deleted,
        },
    )))
}

//*GET:: api/devices/device_id/votes
pub async fn get_device_votes(
    Extension(storage): Extension<Arc<Storage>>,
    Path(device_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<DeviceVoteDTO>>>, AppError> {
    let votes = VoteRepository::new(storage)
        .votes_for_device(&device_id)
        .await?
        .into_iter()
        .map(|vote| DeviceVoteDTO {
            question_id: vote.question_id,
            option_id: vote.option_id,
        })
        .collect();

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Device votes retrieved successfully",
        votes,
    )))
}

fn required(field: Option<String>, name: &'static str) -> Result<String, AppError> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AppError::Vote(VotesError::MissingField(name)))
}
