use axum::{
    routing::{get, post, put},
    Router,
};

use crate::controllers::event_controller::{
    acknowledge_clear_notification, get_cleared_question, get_event_by_id, get_event_questions,
    set_current_question,
};

pub fn event_router() -> Router {
    Router::new()
        .route("/{event_id}", get(get_event_by_id))
        .route("/{event_id}/questions", get(get_event_questions))
        .route("/{event_id}/current-question", put(set_current_question))
        .route("/{event_id}/cleared", get(get_cleared_question))
        .route(
            "/{event_id}/clear-notification",
            post(acknowledge_clear_notification),
        )
}
