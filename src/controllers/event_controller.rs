use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    config::storage::Storage,
    dtos::{
        requests::SetCurrentQuestionDTO,
        responses::{ApiResponse, ClearedResponseDTO, EventResponseDTO},
    },
    error::{AppError, EventsError},
    models::question::Question,
    repositories::{event_repository::EventRepository, question_repository::QuestionRepository},
};

//*GET:: api/events/event_id
pub async fn get_event_by_id(
    Extension(storage): Extension<Arc<Storage>>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<EventResponseDTO>>, AppError> {
    let event_repository = EventRepository::new(storage.clone());
    let question_repository = QuestionRepository::new(storage);

    let event = event_repository
        .get_event(&event_id)
        .await?
        .ok_or(AppError::Event(EventsError::EventNotFound))?;
    let questions = question_repository.questions_for_event(&event_id).await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Event retrieved successfully",
        EventResponseDTO::new(event, questions),
    )))
}

//*GET:: api/events/event_id/questions
pub async fn get_event_questions(
    Extension(storage): Extension<Arc<Storage>>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Question>>>, AppError> {
    let event_repository = EventRepository::new(storage.clone());
    let question_repository = QuestionRepository::new(storage);

    event_repository
        .get_event(&event_id)
        .await?
        .ok_or(AppError::Event(EventsError::EventNotFound))?;
    let questions = question_repository.questions_for_event(&event_id).await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Questions retrieved successfully",
        questions,
    )))
}

//?PUT:: api/events/event_id/current-question
pub async fn set_current_question(
    Extension(storage): Extension<Arc<Storage>>,
    Path(event_id): Path<String>,
    Json(payload): Json<SetCurrentQuestionDTO>,
) -> Result<Json<ApiResponse<EventResponseDTO>>, AppError> {
    let event_repository = EventRepository::new(storage.clone());
    let question_repository = QuestionRepository::new(storage);

    let question_id = payload.question_id.filter(|id| !id.is_empty());
    if let Some(question_id) = &question_id {
        let question = question_repository
            .get_question(question_id)
            .await?
            .ok_or(AppError::Event(EventsError::QuestionNotFound))?;
        if question.event_id != event_id {
            return Err(AppError::Event(EventsError::QuestionNotInEvent));
        }
    }

    let event = event_repository
        .set_current_question(&event_id, question_id)
        .await?;
    let questions = question_repository.questions_for_event(&event_id).await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Current question updated successfully",
        EventResponseDTO::new(event, questions),
    )))
}

//*GET:: api/events/event_id/cleared
pub async fn get_cleared_question(
    Extension(storage): Extension<Arc<Storage>>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<ClearedResponseDTO>>, AppError> {
    let event = EventRepository::new(storage)
        .get_event(&event_id)
        .await?
        .ok_or(AppError::Event(EventsError::EventNotFound))?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Cleared flag retrieved successfully",
        ClearedResponseDTO {
            cleared_question_id: event.cleared_question_id,
        },
    )))
}

//?POST:: api/events/event_id/clear-notification
pub async fn acknowledge_clear_notification(
    Extension(storage): Extension<Arc<Storage>>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<ClearedResponseDTO>>, AppError> {
    let event = EventRepository::new(storage)
        .acknowledge_cleared(&event_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        StatusCode::OK.as_u16(),
        "Clear notification acknowledged",
        ClearedResponseDTO {
            cleared_question_id: event.cleared_question_id,
        },
    )))
}
