use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::vote_controller::{
    cast_vote, clear_question_votes, get_device_votes, get_question_votes,
};

pub fn vote_router() -> Router {
    Router::new()
        .route("/votes", post(cast_vote))
        .route(
            "/questions/{question_id}/votes",
            get(get_question_votes).delete(clear_question_votes),
        )
        .route("/devices/{device_id}/votes", get(get_device_votes))
}
