//! High-level procedures over already-fetched service payloads.
//!
//! Each workflow is a pure function of its inputs; fetching is the caller's job.

pub mod isoforms;
pub mod search;
