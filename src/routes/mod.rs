pub mod event_route;
pub mod vote_route;
