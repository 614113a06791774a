//! Persuasion & Emotion analyzers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::eval::{RuleConfig, Verdict};
use crate::rules::heuristics::{KeywordSet, against_target, clamp_score, graded, saturating};
use crate::signals::NormalizedText;

const PAIN_KEYWORDS: &[&str] = &[
    "struggle",
    "pain",
    "problem",
    "frustration",
    "tired",
    "difficult",
    "challenge",
    "worry",
    "fear",
    "risk",
    "avoid",
    "stress",
    "overwhelm",
    "fail",
    "annoying",
    "embarrass",
    "stuck",
    "helpless",
];

const SOLUTION_KEYWORDS: &[&str] = &[
    "solution",
    "solve",
    "help",
    "improve",
    "increase",
    "boost",
    "enhance",
    "transform",
    "fix",
    "resolve",
    "overcome",
    "achieve",
    "gain",
    "benefit",
    "advantage",
    "success",
    "result",
];

/// Matches per side needed for full marks.
const PAIN_SOLUTION_FULL: f64 = 5.0;
const PAIN_FLOOR: f64 = 40.0;
const SOLUTION_FLOOR: f64 = 60.0;

static EMOTIONAL: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "imagine",
        "transform",
        "desperate",
        "desperately",
        "love",
        "hate",
        "fear",
        "secret",
        "amazing",
        "finally",
        "discover",
        "freedom",
        "powerful",
        "breakthrough",
        "shocking",
        "instantly",
        "effortless",
        "proud",
        "confident",
        "frustrated",
        "relief",
        "joy",
        "excited",
        "incredible",
        "dream",
        "embarrassed",
        "heartbreaking",
        "thrilled",
    ])
});

static CREDIBILITY: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "testimonial",
        "study",
        "studies",
        "research",
        "proven",
        "certified",
        "expert",
        "experts",
        "award",
        "award-winning",
        "customers",
        "reviews",
        "rated",
        "clinically",
        "featured in",
        "trusted",
        "according to",
        "endorsed",
        "verified",
        "doctor",
        "scientist",
        "university",
        "published",
        "peer-reviewed",
    ])
});

static RISK_REVERSAL: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "guarantee",
        "guaranteed",
        "money-back",
        "money back",
        "risk-free",
        "risk free",
        "refund",
        "no questions asked",
        "cancel anytime",
        "free trial",
        "no risk",
        "satisfaction",
        "completely satisfied",
        "try it free",
    ])
});

static VAGUE: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "many", "lots", "some", "very", "really", "things", "stuff", "various", "several",
        "numerous", "a lot",
    ])
});

static FIGURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9%$]").unwrap());

pub fn emotional_triggers(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let hits = EMOTIONAL.distinct_hits(&text.plain_text);
    let score = saturating(hits.len(), 5);
    let feedback = graded(
        score,
        config,
        "Strong emotional language that pulls the reader in.",
        "Some emotional pull. Add a few more vivid, feeling-driven words.",
        "Your copy reads flat. Use words that make the reader feel something.",
    );
    Verdict::scored(score, config, feedback)
}

/// Pain/solution balance.
///
/// Passes when both sides clear their floors, or when the weighted overall
/// reaches the configured threshold. This is the one analyzer whose pass flag
/// is not `score >= threshold`.
pub fn pain_solution(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let lower = text.lowercase();
    let pain_matches = PAIN_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    let solution_matches = SOLUTION_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count();

    let pain = (pain_matches as f64 * 100.0 / PAIN_SOLUTION_FULL).min(100.0);
    let solution = (solution_matches as f64 * 100.0 / PAIN_SOLUTION_FULL).min(100.0);
    // 0.4 * pain + 0.6 * solution, kept exact at the band edges
    let overall = (pain * 4.0 + solution * 6.0) / 10.0;

    let balanced = pain >= PAIN_FLOOR && solution >= SOLUTION_FLOOR;
    let feedback = if pain < PAIN_FLOOR {
        "Your copy doesn't clearly identify customer pain points."
    } else if solution < SOLUTION_FLOOR {
        "You identify problems but don't strongly position your product as the solution."
    } else {
        "Good balance of highlighting problems and offering solutions."
    };

    Verdict {
        passed: balanced || overall >= f64::from(config.threshold),
        score: clamp_score(overall),
        feedback: feedback.to_string(),
        highlights: Vec::new(),
    }
}

pub fn specificity(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let with_figures = text
        .sentences
        .iter()
        .filter(|s| FIGURE_RE.is_match(&s.text))
        .count();
    let ratio = with_figures as f64 / text.sentence_count() as f64;
    let vague = VAGUE.occurrences(&text.plain_text);

    let raw = f64::from(against_target(ratio, 1.0 / 3.0)) - 5.0 * vague as f64;
    let score = clamp_score(raw);

    let feedback = if score >= config.threshold {
        "Concrete numbers and specifics make your claims believable.".to_string()
    } else if vague > 0 {
        format!(
            "Replace vague words ({vague} found) with exact numbers, names and results."
        )
    } else {
        "Add specific figures: how many, how much, how fast.".to_string()
    };
    Verdict::scored(score, config, feedback)
}

pub fn credibility(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let hits = CREDIBILITY.distinct_hits(&text.plain_text);
    let score = saturating(hits.len(), 4);
    let feedback = graded(
        score,
        config,
        "Good use of proof and trust signals.",
        "Add more proof: testimonials, studies or expert endorsements.",
        "No credible proof found. Back your claims with testimonials or data.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn risk_reversal(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let hits = RISK_REVERSAL.distinct_hits(&text.plain_text);
    let score = saturating(hits.len(), 3);
    let feedback = graded(
        score,
        config,
        "Strong risk reversal. Buyers have nothing to lose.",
        "Strengthen your guarantee so the reader feels no risk.",
        "Remove the buyer's risk with a clear guarantee or refund promise.",
    );
    Verdict::scored(score, config, feedback)
}
