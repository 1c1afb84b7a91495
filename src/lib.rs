//! Live audience voting.
//!
//! The server half keeps events, questions and votes in flat JSON files and
//! serves them over a small REST API. The client half turns that pull-only
//! API into pseudo-subscriptions ([`sync`]), tallies votes ([`stats`]) and
//! eases the tallies into animated bars ([`animation`], [`carousel`]).

pub mod animation;
pub mod app;
pub mod carousel;
pub mod client;
pub mod config;
pub mod console;
pub mod controllers;
pub mod display;
pub mod dtos;
pub mod error;
pub mod local;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod stats;
pub mod sync;
pub mod voting;

#[cfg(test)]
mod tests;
