//! Types for stream selection.

use serde::{Deserialize, Serialize};

use crate::catalog::StreamCandidate;
use crate::resolver::ResolvedStream;

/// Navigation-provided hint naming the source the user arrived from.
///
/// When the viewer taps a specific entry on a sources screen, that choice
/// is preserved verbatim instead of being re-ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHint {
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// Viewer preferences for one selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionPrefs {
    /// Preferred audio language (any spelling; normalized internally).
    #[serde(default)]
    pub preferred_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<SourceHint>,
}

/// The result of a successful selection: one committed candidate plus the
/// residual ordering for failover.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    /// Pool index of the chosen candidate.
    pub index: usize,
    pub candidate: StreamCandidate,
    pub resolved: ResolvedStream,
    /// Eligible pool indices ranked best-first; drives failover iteration.
    pub ranking: Vec<usize>,
    /// Whether a navigation hint picked this candidate (user intent).
    pub via_hint: bool,
}
