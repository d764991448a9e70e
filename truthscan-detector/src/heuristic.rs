//! Keyword heuristic used when the classification API is unavailable.
//!
//! The verdict is a pure function of the input text: suspicion terms raise the
//! score, reliability terms lower it, and very short texts get a flat penalty.

use crate::types::{AnalysisDetails, AnalysisResult, Credibility};

/// Terms that suggest sensationalist or fabricated content.
pub const SUSPICION_VOCABULARY: [&str; 16] = [
    "breaking",
    "shocking",
    "unbelievable",
    "secret",
    "exposed",
    "leaked",
    "exclusive",
    "bombshell",
    "scandal",
    "conspiracy",
    "hoax",
    "fake",
    "lies",
    "cover-up",
    "hidden truth",
    "they don't want you to know",
];

/// Terms that suggest sourced reporting.
pub const RELIABILITY_VOCABULARY: [&str; 8] = [
    "according to",
    "research shows",
    "study finds",
    "experts say",
    "data indicates",
    "official statement",
    "confirmed by",
    "verified",
];

const SUSPICION_WEIGHT: i64 = 10;
const RELIABILITY_WEIGHT: i64 = 5;

/// Texts with fewer words than this get [`SHORT_TEXT_PENALTY`].
pub const SHORT_TEXT_WORDS: usize = 50;
const SHORT_TEXT_PENALTY: i64 = 20;

/// Terms from `vocabulary` that occur in `haystack`, in vocabulary order.
fn matched_terms(haystack: &str, vocabulary: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|term| haystack.contains(*term))
        .map(|term| (*term).to_string())
        .collect()
}

/// Score `text` with the keyword heuristic.
///
/// Each vocabulary term counts at most once however often it appears. Word
/// count is taken from the original text, matching is done on its lower-cased
/// form.
pub fn score_text(text: &str) -> AnalysisResult {
    let lower = text.to_lowercase();

    let suspicious_keywords = matched_terms(&lower, &SUSPICION_VOCABULARY);
    let reliable_indicators = matched_terms(&lower, &RELIABILITY_VOCABULARY);

    let fake_count = suspicious_keywords.len() as i64;
    let reliable_count = reliable_indicators.len() as i64;
    let text_length = text.split_whitespace().count();

    let mut raw = fake_count * SUSPICION_WEIGHT - reliable_count * RELIABILITY_WEIGHT;
    if text_length < SHORT_TEXT_WORDS {
        raw += SHORT_TEXT_PENALTY;
    }
    let score = raw.clamp(0, 100) as u8;
    let credibility = Credibility::from_score(score);

    AnalysisResult {
        score,
        credibility,
        status: credibility.status(),
        fake_keywords_found: suspicious_keywords.len() as u32,
        reliable_indicators_found: reliable_indicators.len() as u32,
        analysis: AnalysisDetails {
            text_length,
            suspicious_keywords,
            reliable_indicators,
        },
    }
}
