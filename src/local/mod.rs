//! Device-local state: the key/value store, the vote-status guard and the
//! device identity kept in it.

pub mod device;
pub mod store;
pub mod vote_status;
