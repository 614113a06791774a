use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::catalog::RuleKind;
use crate::rules::heuristics::{clarity, conversion, engagement, persuasion};
use crate::signals::NormalizedText;

pub const NO_CONTENT_FEEDBACK: &str = "No content to analyze.";

/// Per-rule configuration resolved from the catalog and any override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    pub threshold: u8,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("threshold {0} is outside 0..=100")]
    InvalidThreshold(u8),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HighlightSeverity {
    Success,
    Warning,
    Error,
}

/// Span of plain text an analyzer wants to annotate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub severity: HighlightSeverity,
}

/// What a single analyzer concluded about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub score: u8,
    pub feedback: String,
    pub highlights: Vec<Highlight>,
}

impl Verdict {
    pub fn no_content() -> Self {
        Self {
            passed: false,
            score: 0,
            feedback: NO_CONTENT_FEEDBACK.to_string(),
            highlights: Vec::new(),
        }
    }

    /// Standard verdict: passes exactly when `score >= threshold`.
    pub fn scored(score: u8, config: &RuleConfig, feedback: impl Into<String>) -> Self {
        let score = score.min(100);
        Self {
            passed: score >= config.threshold,
            score,
            feedback: feedback.into(),
            highlights: Vec::new(),
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<Highlight>) -> Self {
        self.highlights = highlights;
        self
    }
}

/// Run the analyzer for `rule` over `text`.
///
/// Empty input always yields `Verdict::no_content()`. The only error is an
/// invalid configuration; callers degrade it to a failed result.
pub fn evaluate(
    rule: RuleKind,
    text: &NormalizedText,
    config: &RuleConfig,
) -> Result<Verdict, AnalyzeError> {
    if config.threshold > 100 {
        return Err(AnalyzeError::InvalidThreshold(config.threshold));
    }
    if text.is_empty() {
        return Ok(Verdict::no_content());
    }

    let verdict = match rule {
        RuleKind::SentenceLength => clarity::sentence_length(text, config),
        RuleKind::Readability => clarity::readability(text, config),
        RuleKind::Structure => clarity::structure(text, config),
        RuleKind::ActiveVoice => clarity::active_voice(text, config),
        RuleKind::CommaRhythm => clarity::comma_rhythm(text, config),
        RuleKind::EmotionalTriggers => persuasion::emotional_triggers(text, config),
        RuleKind::PainSolution => persuasion::pain_solution(text, config),
        RuleKind::Specificity => persuasion::specificity(text, config),
        RuleKind::Credibility => persuasion::credibility(text, config),
        RuleKind::RiskReversal => persuasion::risk_reversal(text, config),
        RuleKind::OpeningHook => engagement::opening_hook(text, config),
        RuleKind::Transitions => engagement::transitions(text, config),
        RuleKind::PatternInterrupts => engagement::pattern_interrupts(text, config),
        RuleKind::Storytelling => engagement::storytelling(text, config),
        RuleKind::ConversationalTone => engagement::conversational_tone(text, config),
        RuleKind::CallToAction => conversion::call_to_action(text, config),
        RuleKind::Urgency => conversion::urgency(text, config),
        RuleKind::ValueProposition => conversion::value_proposition(text, config),
        RuleKind::FuturePacing => conversion::future_pacing(text, config),
        RuleKind::DecisionSimplification => conversion::decision_simplification(text, config),
        RuleKind::Reassurance => conversion::reassurance(text, config),
    };

    Ok(verdict)
}
