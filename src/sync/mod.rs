//! Pseudo-subscriptions over the pull-only API.

pub mod channels;
pub mod polling;

pub use polling::{Delivery, PollingChannel, Subscription};
