//! Offline preprocessing: arc-flag computation and ALT landmark tables.
//!
//! Both build a one-time index consumed at query time by [`crate::search`];
//! neither is on the query hot path, so they favour clarity and parallel
//! throughput over the allocation discipline `search` observes.

pub mod alt;
pub mod arcflags;
