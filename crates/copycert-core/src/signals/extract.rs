//! Markup stripping and segmentation.
//!
//! `normalize` is the only entry point. It is pure: the same input always
//! yields the same `NormalizedText`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::signals::model::{Layout, NormalizedText, Sentence};

static BLOCK_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?\s*(?:p|div|li|ul|ol|h[1-6]|blockquote|br)\b[^>]*>").unwrap()
});

static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static LIST_ITEM_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*li\b").unwrap());

static HEADING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*h[1-6]\b").unwrap());

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static BULLET_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[•\-*]\s|\d+[.)]\s)").unwrap());

static HEADING_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#{1,6}\s").unwrap());

/// Strip markup and segment the document.
pub fn normalize(markup: &str) -> NormalizedText {
    let plain_text = strip_markup(markup);
    let sentences = split_sentences(&plain_text);
    let words = split_words(&plain_text);
    let layout = layout(markup, &plain_text);

    NormalizedText {
        plain_text,
        sentences,
        words,
        layout,
    }
}

/// Remove tags. Block tags become line breaks so adjacent blocks never fuse
/// into one word; inline tags vanish. Entities are left as written.
pub fn strip_markup(markup: &str) -> String {
    let blocks_broken = BLOCK_TAG_RE.replace_all(markup, "\n");
    let stripped = ANY_TAG_RE.replace_all(&blocks_broken, "");
    stripped.trim().to_string()
}

pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Split on runs of `.`, `!` and `?`. Whitespace-only fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut cursor = 0;

    for m in SENTENCE_END_RE.find_iter(text) {
        push_fragment(text, cursor, m.start(), text[m.range()].chars().next(), &mut sentences);
        cursor = m.end();
    }
    push_fragment(text, cursor, text.len(), None, &mut sentences);

    sentences
}

fn push_fragment(
    text: &str,
    from: usize,
    to: usize,
    terminator: Option<char>,
    out: &mut Vec<Sentence>,
) {
    let raw = &text[from..to];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let start = from + lead;
    out.push(Sentence {
        text: trimmed.to_string(),
        start,
        end: start + trimmed.len(),
        terminator,
        words: split_words(trimmed),
    });
}

fn layout(markup: &str, plain_text: &str) -> Layout {
    let mut paragraph_word_counts = Vec::new();
    let mut list_items = LIST_ITEM_TAG_RE.find_iter(markup).count();
    let mut headings = HEADING_TAG_RE.find_iter(markup).count();

    // Plain-text conventions only count when the markup did not already
    // describe the structure.
    let count_plain_lists = list_items == 0;
    let count_plain_headings = headings == 0;

    for line in plain_text.lines() {
        let words = line.split_whitespace().count();
        if words == 0 {
            continue;
        }
        paragraph_word_counts.push(words);
        if count_plain_lists && BULLET_LINE_RE.is_match(line) {
            list_items += 1;
        }
        if count_plain_headings && HEADING_LINE_RE.is_match(line) {
            headings += 1;
        }
    }

    Layout {
        paragraph_word_counts,
        list_items,
        headings,
    }
}
