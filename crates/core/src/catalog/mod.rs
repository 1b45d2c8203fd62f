//! Stream catalog abstraction.
//!
//! This module provides the `CandidateSource` trait for fetching playable
//! stream candidates for a title from whatever catalog backend the host
//! application wires in (scraper aggregators, debrid add-ons, etc.).

mod types;

pub use types::*;
