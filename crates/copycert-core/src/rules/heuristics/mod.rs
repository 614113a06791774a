//! Text-statistics analyzers, one function per rule category.
//!
//! Every analyzer maps a percentage-of-criterion-met onto 0..=100. The
//! dispatcher in `rules::eval` handles empty input and configuration errors
//! before any of these run, so they may assume at least one word and one
//! sentence.

pub mod clarity;
pub mod conversion;
pub mod engagement;
pub mod persuasion;

use regex::Regex;

use crate::rules::eval::RuleConfig;

/// Percentage of `part` in `whole`; zero when `whole` is zero.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Round and clamp a raw score into 0..=100.
pub(crate) fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Full marks once `hits` reaches `full_marks`, linear below.
pub(crate) fn saturating(hits: usize, full_marks: usize) -> u8 {
    if full_marks == 0 {
        return 100;
    }
    clamp_score(hits as f64 / full_marks as f64 * 100.0)
}

/// Full marks once `ratio` reaches `target`, linear below.
pub(crate) fn against_target(ratio: f64, target: f64) -> u8 {
    if target <= 0.0 {
        return 100;
    }
    clamp_score(ratio / target * 100.0)
}

/// Feedback text for the common three-band case: passing, within 20 points
/// of passing, and well short.
pub(crate) fn graded<'a>(
    score: u8,
    config: &RuleConfig,
    pass: &'a str,
    near: &'a str,
    fail: &'a str,
) -> &'a str {
    if score >= config.threshold {
        pass
    } else if score >= config.threshold.saturating_sub(20) {
        near
    } else {
        fail
    }
}

/// A fixed list of keywords or phrases matched on word boundaries,
/// case-insensitively.
pub(crate) struct KeywordSet {
    entries: Vec<(&'static str, Regex)>,
}

impl KeywordSet {
    pub(crate) fn new(words: &[&'static str]) -> Self {
        let entries = words
            .iter()
            .map(|w| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(w))).unwrap();
                (*w, re)
            })
            .collect();
        Self { entries }
    }

    /// Keywords that occur at least once, in list order.
    pub(crate) fn distinct_hits(&self, text: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(w, _)| *w)
            .collect()
    }

    /// Total occurrences across all keywords.
    pub(crate) fn occurrences(&self, text: &str) -> usize {
        self.entries
            .iter()
            .map(|(_, re)| re.find_iter(text).count())
            .sum()
    }

    pub(crate) fn any_match(&self, text: &str) -> bool {
        self.entries.iter().any(|(_, re)| re.is_match(text))
    }
}
