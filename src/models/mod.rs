pub mod event;
pub mod question;
pub mod vote;
