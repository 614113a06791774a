//! Call to Action & Conversion analyzers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::eval::{RuleConfig, Verdict};
use crate::rules::heuristics::{KeywordSet, graded, saturating};
use crate::signals::NormalizedText;

/// A CTA counts as well placed when it sits in the last few sentences.
const CTA_TAIL: usize = 3;

static CTA_OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:click|buy|order|get|claim|join|start|call|sign up|download|grab|try",
        r"|subscribe|register|book|reserve|shop|discover|apply|request|enroll|secure)\b",
    ))
    .unwrap()
});

static CTA_URGENCY: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&["now", "today", "right away", "immediately", "tonight", "before"])
});

static URGENCY: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "limited",
        "only",
        "today",
        "now",
        "deadline",
        "expires",
        "last chance",
        "ends",
        "hurry",
        "left",
        "spots",
        "while supplies last",
        "don't miss",
        "act fast",
        "tonight",
        "final",
        "running out",
        "midnight",
    ])
});

static VALUE: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "unlike",
        "unique",
        "exclusive",
        "benefit",
        "benefits",
        "save",
        "so you can",
        "which means",
        "results",
        "better",
        "faster",
        "easier",
        "without",
        "the only",
        "deliver",
        "advantage",
    ])
});

static FUTURE_PACING: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "imagine",
        "picture",
        "soon",
        "future",
        "days from now",
        "tomorrow",
        "weeks from now",
        "wake up",
        "waking up",
        "see yourself",
        "just think",
        "you'll",
        "you will",
        "what it feels like",
    ])
});

static SIMPLIFIERS: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "simple",
        "simply",
        "easy",
        "just",
        "only takes",
        "one click",
        "two choices",
        "step",
        "steps",
        "all you need",
        "here's how",
        "that's it",
        "no hassle",
        "in minutes",
        "quick",
    ])
});

static REASSURANCE: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "after you",
        "immediately",
        "instant access",
        "support",
        "our team",
        "we'll",
        "you'll receive",
        "standing by",
        "join thousands",
        "welcome",
        "rest assured",
        "good hands",
        "help you",
        "every step",
    ])
});

pub fn call_to_action(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let total = text.sentence_count();
    let ctas: Vec<usize> = text
        .sentences
        .iter()
        .enumerate()
        .filter(|(_, s)| CTA_OPENER_RE.is_match(&s.text))
        .map(|(i, _)| i)
        .collect();

    if ctas.is_empty() {
        return Verdict::scored(
            0,
            config,
            "No clear call to action. Tell the reader exactly what to do next.",
        );
    }

    let well_placed = ctas.iter().any(|&i| i + CTA_TAIL >= total);
    let urgent = ctas
        .iter()
        .any(|&i| CTA_URGENCY.any_match(&text.sentences[i].text));

    let mut score = 50u8;
    if well_placed {
        score += 25;
    }
    if urgent {
        score += 25;
    }

    let feedback = if score >= config.threshold {
        "Clear, compelling call to action.".to_string()
    } else if !well_placed {
        "Move your call to action to the close of the copy.".to_string()
    } else {
        "Give your call to action a reason to act now.".to_string()
    };
    Verdict::scored(score, config, feedback)
}

pub fn urgency(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let score = saturating(URGENCY.distinct_hits(&text.plain_text).len(), 4);
    let feedback = graded(
        score,
        config,
        "Real urgency without overselling.",
        "Add a concrete reason to act now: a deadline or limited supply.",
        "Nothing pushes the reader to act now. Add honest urgency or scarcity.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn value_proposition(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let score = saturating(VALUE.distinct_hits(&text.plain_text).len(), 5);
    let feedback = graded(
        score,
        config,
        "Your unique value is clear.",
        "Spell out what makes you different and what the reader gains.",
        "The reader can't tell why you're better. State your unique benefit.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn future_pacing(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let score = saturating(FUTURE_PACING.distinct_hits(&text.plain_text).len(), 4);
    let feedback = graded(
        score,
        config,
        "The reader can see their better future.",
        "Paint the after picture more vividly.",
        "Help the reader imagine life after buying.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn decision_simplification(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let score = saturating(SIMPLIFIERS.distinct_hits(&text.plain_text).len(), 3);
    let feedback = graded(
        score,
        config,
        "Saying yes feels easy.",
        "Make the next step sound simpler.",
        "The decision feels complicated. Show how easy it is to say yes.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn reassurance(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let score = saturating(REASSURANCE.distinct_hits(&text.plain_text).len(), 3);
    let feedback = graded(
        score,
        config,
        "Buyers will feel confident after purchase.",
        "Tell buyers what happens after they order.",
        "Reassure buyers: access, support and what comes next.",
    );
    Verdict::scored(score, config, feedback)
}
