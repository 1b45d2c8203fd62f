//! Candidate resolution and reachability probing.
//!
//! Providers hand out candidate links that may need a final resolution step
//! before playback (token exchange, redirect unwrapping). The
//! `StreamResolver` trait abstracts that step; `ReachabilityProber` performs
//! the bounded-time liveness check the selector runs before committing to a
//! non-debrid HTTP candidate.

mod prober;
mod types;

pub use prober::{Prober, ReachabilityProber};
pub use types::*;
