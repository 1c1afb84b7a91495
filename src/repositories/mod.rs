pub mod event_repository;
pub mod question_repository;
pub mod vote_repository;
