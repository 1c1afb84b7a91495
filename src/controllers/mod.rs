pub mod event_controller;
pub mod vote_controller;
