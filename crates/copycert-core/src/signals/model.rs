use serde::{Deserialize, Serialize};

/// Plain-text view of a document plus the segmentations every analyzer reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedText {
    /// Document text with all markup removed. Highlight offsets index into this.
    pub plain_text: String,
    pub sentences: Vec<Sentence>,
    pub words: Vec<String>,
    pub layout: Layout,
}

impl NormalizedText {
    /// True when there is nothing an analyzer could score.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() || self.sentences.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Lowercased plain text, for keyword matching.
    pub fn lowercase(&self) -> String {
        self.plain_text.to_lowercase()
    }
}

/// A single sentence fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    /// Trimmed text without the terminator.
    pub text: String,
    /// Byte offset of `text` in the plain text.
    pub start: usize,
    /// Byte offset one past the end of `text`.
    pub end: usize,
    /// First character of the delimiter run, `None` for a trailing fragment.
    pub terminator: Option<char>,
    pub words: Vec<String>,
}

impl Sentence {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_question(&self) -> bool {
        self.terminator == Some('?')
    }

    pub fn is_exclamation(&self) -> bool {
        self.terminator == Some('!')
    }
}

/// Block structure counted from markup and plain-text conventions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Layout {
    /// Word counts of each non-empty line of plain text.
    pub paragraph_word_counts: Vec<usize>,
    pub list_items: usize,
    pub headings: usize,
}

impl Layout {
    pub fn paragraph_count(&self) -> usize {
        self.paragraph_word_counts.len()
    }
}
