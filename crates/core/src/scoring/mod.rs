//! Candidate scoring.
//!
//! Pure functions that turn a candidate's scraped metadata into an integer
//! ranking score. Two components: a *stability* score built from quality
//! tier, size heuristics and textual risk markers, and a *language affinity*
//! tier. Affinity dominates: a candidate in the viewer's language always
//! outranks a technically nicer candidate in the wrong one.

mod weights;

pub use weights::ScoreWeights;

use serde::{Deserialize, Serialize};

use crate::catalog::StreamCandidate;
use crate::lang::{is_known_code, normalize_language};

/// A candidate's computed ranking scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredStream {
    /// Index into the candidate pool.
    pub index: usize,
    /// Language affinity tier (0-2).
    pub affinity: u8,
    /// Stability score from quality/size/risk heuristics.
    pub stability: i64,
    /// Combined ranking score: `affinity * affinity_weight + stability`.
    pub combined: i64,
}

/// Tokens split on anything non-alphanumeric. Keeps codec markers like
/// "x265" intact and isolates short flags like "dv" from words that merely
/// contain them ("dvdrip").
fn alnum_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Tokens split on anything non-alphabetic, for language scanning.
/// "ITA1080p" yields "ita" rather than one fused token.
fn alpha_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Quality tier 0-4 from release text: 4K > 1080p > 720p > 480p > unknown.
pub fn quality_tier(text: &str) -> i64 {
    let lower = text.to_lowercase();
    if lower.contains("4k") || lower.contains("2160p") {
        4
    } else if lower.contains("1080p") {
        3
    } else if lower.contains("720p") {
        2
    } else if lower.contains("480p") {
        1
    } else {
        0
    }
}

/// Whether release text flags Dolby Vision.
pub fn is_dolby_vision(text: &str) -> bool {
    let tokens = alnum_tokens(text);
    let normalized = tokens.join(" ");
    normalized.contains("dolby vision")
        || tokens.iter().any(|t| t == "dovi" || t == "dv")
}

/// Whether release text flags a remux.
pub fn is_remux(text: &str) -> bool {
    text.to_lowercase().contains("remux")
}

/// Whether release text flags a cam or telesync rip.
pub fn is_cam_rip(text: &str) -> bool {
    alnum_tokens(text)
        .iter()
        .any(|t| matches!(t.as_str(), "cam" | "camrip" | "hdcam" | "telesync" | "hdts"))
}

fn has_web_source(normalized: &str) -> bool {
    normalized.contains("web dl")
        || normalized.contains("webdl")
        || normalized.contains("webrip")
        || normalized.contains("web rip")
}

fn has_efficient_codec(normalized: &str) -> bool {
    normalized.contains("x265")
        || normalized.contains("h265")
        || normalized.contains("h 265")
        || normalized.contains("hevc")
        || normalized.contains("av1")
}

fn has_legacy_codec(normalized: &str) -> bool {
    normalized.contains("x264")
        || normalized.contains("h264")
        || normalized.contains("h 264")
        || normalized.contains("avc")
}

/// Stability score for one candidate.
///
/// Higher is more likely to start quickly and play smoothly. The result is
/// only meaningful relative to other candidates for the same title.
pub fn stability_score(candidate: &StreamCandidate, weights: &ScoreWeights) -> i64 {
    let mut text = candidate.quality_label.clone();
    if let Some(ref hint) = candidate.file_name_hint {
        text.push(' ');
        text.push_str(hint);
    }
    let normalized = alnum_tokens(&text).join(" ");

    let mut score = quality_tier(&text) * weights.quality_tier_weight;

    score += size_preference(candidate.size_bytes(), weights);

    if is_remux(&text) {
        score += weights.remux_penalty;
    }
    if is_dolby_vision(&text) {
        score += weights.dolby_vision_penalty;
    }
    if is_cam_rip(&text) {
        score += weights.cam_penalty;
    }
    if has_web_source(&normalized) {
        score += weights.web_source_bonus;
    }
    if has_efficient_codec(&normalized) {
        score += weights.efficient_codec_bonus;
    } else if has_legacy_codec(&normalized) {
        score += weights.legacy_codec_bonus;
    }

    if candidate.cached || candidate.is_http() {
        score += weights.cached_bonus;
    }
    if !candidate.web_ready {
        score += weights.not_web_ready_penalty;
    }
    if candidate.is_magnet() {
        score += weights.magnet_penalty;
    }

    score
}

/// Size preference curve: a sweet spot around reasonably sized encodes,
/// tapering bonuses through the teens of GB, penalties past ~25 GB.
fn size_preference(size_bytes: u64, weights: &ScoreWeights) -> i64 {
    if size_bytes == 0 {
        weights.size_unknown_bonus
    } else if size_bytes <= weights.size_sweet_max_bytes {
        weights.size_sweet_bonus
    } else if size_bytes <= weights.size_mid_max_bytes {
        weights.size_mid_bonus
    } else if size_bytes <= weights.size_high_max_bytes {
        weights.size_high_bonus
    } else if size_bytes <= weights.size_oversize_max_bytes {
        weights.size_oversize_penalty
    } else {
        weights.size_huge_penalty
    }
}

/// Try to read a language code out of one scanned token.
///
/// Prefix fallbacks only apply to tokens of length >= 4; short English words
/// collide with 2-letter codes ("the" -> "th") otherwise.
fn recognize_language_token(token: &str) -> Option<String> {
    let normalized = normalize_language(token);
    if is_known_code(&normalized) {
        return Some(normalized);
    }
    if token.len() >= 4 {
        let three = normalize_language(&token[..3]);
        if is_known_code(&three) {
            return Some(three);
        }
        let two = normalize_language(&token[..2]);
        if is_known_code(&two) {
            return Some(two);
        }
    }
    None
}

/// Language affinity tier for a candidate.
///
/// Tier 2: the preferred language is explicitly tagged. Tier 1: no
/// recognizable language tag at all, or an explicit multi/dual-audio marker
/// (inclusive, not exclusionary). Tier 0: only *different* recognized
/// languages are tagged.
pub fn language_affinity(candidate: &StreamCandidate, preferred_language: &str) -> u8 {
    let preferred = normalize_language(preferred_language);
    let tokens = alpha_tokens(&candidate.descriptor());
    let mut recognized: Vec<String> = Vec::new();
    let mut multi_audio = false;

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "multi" || token == "dual" {
            multi_audio = true;
            i += 1;
            continue;
        }
        // "pt-br" loses its hyphen to tokenization; reassemble it so the
        // compound never collapses to plain "pt".
        if token == "pt" && tokens.get(i + 1).map(String::as_str) == Some("br") {
            recognized.push("pt-br".to_string());
            i += 2;
            continue;
        }
        if let Some(code) = recognize_language_token(token) {
            recognized.push(code);
        }
        i += 1;
    }

    if recognized.iter().any(|code| *code == preferred) {
        2
    } else if multi_audio || recognized.is_empty() {
        1
    } else {
        0
    }
}

/// Combined ranking score for one candidate.
pub fn combined_score(
    candidate: &StreamCandidate,
    preferred_language: &str,
    weights: &ScoreWeights,
) -> i64 {
    language_affinity(candidate, preferred_language) as i64 * weights.affinity_weight
        + stability_score(candidate, weights)
}

/// Score and rank a candidate pool, best first.
///
/// The sort is stable, so candidates with equal combined scores keep their
/// pool order.
pub fn rank_pool(
    pool: &[StreamCandidate],
    preferred_language: &str,
    weights: &ScoreWeights,
) -> Vec<ScoredStream> {
    let mut scored: Vec<ScoredStream> = pool
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let affinity = language_affinity(candidate, preferred_language);
            let stability = stability_score(candidate, weights);
            ScoredStream {
                index,
                affinity,
                stability,
                combined: affinity as i64 * weights.affinity_weight + stability,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.combined.cmp(&a.combined));
    scored
}
