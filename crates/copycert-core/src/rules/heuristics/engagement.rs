//! Engagement & Flow analyzers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::eval::{RuleConfig, Verdict};
use crate::rules::heuristics::{KeywordSet, against_target, clamp_score, graded, saturating};
use crate::signals::NormalizedText;

const HOOK_MAX_WORDS: usize = 15;
const INTERRUPT_MAX_WORDS: usize = 3;

static SECOND_PERSON: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&["you", "your", "you're", "yourself", "you'll", "you've", "you'd"])
});

static HOOK_WORDS: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "what if", "imagine", "secret", "discover", "why", "how", "stop", "warning", "finally",
        "new", "truth", "mistake", "revealed", "never", "free",
    ])
});

static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

static TRANSITION_OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:but|and|so|because|plus|now|then|still|yet|here's|that's why|in fact",
        r"|even better|best of all|what's more|which means|the truth is|that's not all",
        r"|better yet|after all|that's because|the best part|here's the thing|of course",
        r"|on top of that|the result)\b",
    ))
    .unwrap()
});

static INTERRUPT_OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:wait|stop|listen|look|hold on|seriously|think about it|picture this",
        r"|here's the thing|truth is|ok|okay|now)\b",
    ))
    .unwrap()
});

static DASH_OR_ELLIPSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.|…|—").unwrap());

static STORY_CUES: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "when i",
        "when she",
        "when he",
        "when we",
        "one day",
        "years ago",
        "remember",
        "story",
        "first came",
        "once",
        "back then",
        "until",
        "suddenly",
        "that's when",
        "discovered",
        "realized",
        "struggled",
        "never forget",
        "had tried",
        "turned out",
        "used to",
    ])
});

static STIFF_WORDS: Lazy<KeywordSet> = Lazy::new(|| {
    KeywordSet::new(&[
        "hereby",
        "therefore",
        "thus",
        "whereby",
        "aforementioned",
        "utilize",
        "commence",
        "henceforth",
        "pursuant",
        "notwithstanding",
    ])
});

pub fn opening_hook(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let Some(first) = text.sentences.first() else {
        return Verdict::no_content();
    };

    let provocative = first.is_question() || first.is_exclamation();
    let brief = first.word_count() <= HOOK_MAX_WORDS;
    let personal = SECOND_PERSON.any_match(&first.text);
    let intriguing = HOOK_WORDS.any_match(&first.text) || DIGIT_RE.is_match(&first.text);

    let mut score = 0u8;
    let mut tips = Vec::new();
    if provocative {
        score += 35;
    } else {
        tips.push("open with a question or a bold statement");
    }
    if brief {
        score += 25;
    } else {
        tips.push("keep the first sentence under 15 words");
    }
    if personal {
        score += 20;
    } else {
        tips.push("speak to the reader directly");
    }
    if intriguing {
        score += 20;
    } else {
        tips.push("add curiosity or a concrete number");
    }

    let feedback = if score >= config.threshold {
        "Your opening grabs attention.".to_string()
    } else {
        format!("Sharpen your hook: {}.", tips.join(", "))
    };
    Verdict::scored(score, config, feedback)
}

pub fn transitions(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let bridged = text
        .sentences
        .iter()
        .filter(|s| TRANSITION_OPENER_RE.is_match(&s.text))
        .count();
    let ratio = bridged as f64 / text.sentence_count() as f64;
    let score = against_target(ratio, 0.25);

    let feedback = graded(
        score,
        config,
        "Smooth transitions keep the reader moving.",
        "Add a few more bridges between ideas (\"But here's the thing...\").",
        "Ideas feel disconnected. Link them with transitional phrases.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn pattern_interrupts(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let in_sentences = text
        .sentences
        .iter()
        .filter(|s| {
            s.is_question()
                || s.is_exclamation()
                || s.word_count() <= INTERRUPT_MAX_WORDS
                || INTERRUPT_OPENER_RE.is_match(&s.text)
        })
        .count();
    let marks = DASH_OR_ELLIPSIS_RE.find_iter(&text.plain_text).count();
    let per_ten = (in_sentences + marks) as f64 * 10.0 / text.sentence_count() as f64;
    let score = against_target(per_ten, 2.0);

    let feedback = graded(
        score,
        config,
        "Good pattern interrupts keep attention high.",
        "Break the rhythm more often: a question, a fragment, a pause.",
        "Your copy is monotonous. Surprise the reader with short breaks and questions.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn storytelling(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let hits = STORY_CUES.distinct_hits(&text.plain_text);
    let score = saturating(hits.len(), 5);
    let feedback = graded(
        score,
        config,
        "Your story draws the reader in.",
        "There is a story here. Give it a character, a struggle and a turning point.",
        "Tell a story. People remember narratives, not claims.",
    );
    Verdict::scored(score, config, feedback)
}

pub fn conversational_tone(text: &NormalizedText, config: &RuleConfig) -> Verdict {
    let words = text.word_count() as f64;
    let you = SECOND_PERSON.occurrences(&text.plain_text) as f64;
    let contractions = text
        .words
        .iter()
        .filter(|w| w.contains('\'') || w.contains('’'))
        .count() as f64;
    let stiff = STIFF_WORDS.occurrences(&text.plain_text);

    // 70 points at four "you" per hundred words, 30 at one contraction per fifty.
    let you_points = (you * 100.0 / words / 4.0 * 70.0).min(70.0);
    let contraction_points = (contractions * 50.0 / words * 30.0).min(30.0);
    let score = clamp_score(you_points + contraction_points - 10.0 * stiff as f64);

    let feedback = if score >= config.threshold {
        "Friendly, one-to-one tone.".to_string()
    } else if stiff > 0 {
        format!("Drop the formal wording ({stiff} stiff words) and talk like a person.")
    } else {
        "Write to one reader: use \"you\" and everyday contractions.".to_string()
    };
    Verdict::scored(score, config, feedback)
}
