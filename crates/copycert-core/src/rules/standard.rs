//! The built-in rubric: four pillars, twenty-one edicts.

use crate::rules::catalog::{Affinity, Edict, EdictId, Pillar, PillarId, RuleCatalog, RuleKind};

struct EdictDef {
    id: u32,
    name: &'static str,
    description: &'static str,
    example: &'static str,
    threshold: u8,
    weight: u32,
    affinity: Affinity,
    rule: RuleKind,
}

struct PillarDef {
    id: u32,
    name: &'static str,
    description: &'static str,
    edicts: &'static [EdictDef],
}

const CLARITY: &[EdictDef] = &[
    EdictDef {
        id: 1,
        name: "Short Sentences",
        description: "Keep most sentences under 20 words",
        example: "Use brief sentences. They pack punch. Readers stay engaged.",
        threshold: 80,
        weight: 4,
        affinity: Affinity::Local,
        rule: RuleKind::SentenceLength,
    },
    EdictDef {
        id: 2,
        name: "Readability Level",
        description: "Keep the copy at 6th-8th grade reading level",
        example: "Simple words work best. Avoid complex terminology when simpler options exist.",
        threshold: 85,
        weight: 5,
        affinity: Affinity::Local,
        rule: RuleKind::Readability,
    },
    EdictDef {
        id: 3,
        name: "Structure & Format",
        description: "Use short paragraphs, bullet points, and clear sections",
        example: "Break text into digestible chunks.\n\n• Use bullets for lists\n• Keep paragraphs short\n• Include subheadings",
        threshold: 90,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::Structure,
    },
    EdictDef {
        id: 4,
        name: "Active Voice",
        description: "Use active voice instead of passive voice",
        example: "Active: 'The product increases metabolism'\nPassive: 'Metabolism is increased by the product'",
        threshold: 80,
        weight: 3,
        affinity: Affinity::Both,
        rule: RuleKind::ActiveVoice,
    },
    EdictDef {
        id: 5,
        name: "Comma Usage",
        description: "Use commas judiciously to improve flow and readability",
        example: "For clear, effective copy, use commas to separate ideas, create pauses, and improve rhythm.",
        // The "acceptable" comma band scores 75 and must not pass.
        threshold: 80,
        weight: 2,
        affinity: Affinity::Local,
        rule: RuleKind::CommaRhythm,
    },
];

const PERSUASION: &[EdictDef] = &[
    EdictDef {
        id: 6,
        name: "Emotional Triggers",
        description: "Include words and phrases that evoke strong emotions",
        example: "Transform your life with the solution you've been desperately searching for.",
        threshold: 85,
        weight: 5,
        affinity: Affinity::Both,
        rule: RuleKind::EmotionalTriggers,
    },
    EdictDef {
        id: 7,
        name: "Pain & Solution",
        description: "Clearly identify pain points and position your product as the solution",
        example: "Tired of struggling with weight that won't budge? Our system unlocks your body's natural fat-burning potential.",
        threshold: 90,
        weight: 5,
        affinity: Affinity::Both,
        rule: RuleKind::PainSolution,
    },
    EdictDef {
        id: 8,
        name: "Specificity",
        description: "Use specific numbers, testimonials, and results rather than generalizations",
        example: "Over 10,317 customers lost an average of 17.3 pounds in 30 days.",
        threshold: 80,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::Specificity,
    },
    EdictDef {
        id: 9,
        name: "Credibility Elements",
        description: "Include trust signals, testimonials, and proof",
        example: "Dr. Sarah Miller, leading nutritionist at Boston Medical Center, confirms these results in her peer-reviewed study.",
        threshold: 85,
        weight: 3,
        affinity: Affinity::Both,
        rule: RuleKind::Credibility,
    },
    EdictDef {
        id: 10,
        name: "Risk Reversal",
        description: "Remove barriers to purchase by addressing objections and offering guarantees",
        example: "Try it risk-free with our 60-day money-back guarantee. If you're not completely satisfied, we'll refund every penny. No questions asked.",
        threshold: 90,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::RiskReversal,
    },
];

const ENGAGEMENT: &[EdictDef] = &[
    EdictDef {
        id: 11,
        name: "Opening Hook",
        description: "Start with a compelling hook that grabs attention",
        example: "What if I told you that the weight loss industry has been lying to you for decades?",
        threshold: 90,
        weight: 5,
        affinity: Affinity::Both,
        rule: RuleKind::OpeningHook,
    },
    EdictDef {
        id: 12,
        name: "Transitional Phrases",
        description: "Use transitions to maintain flow between ideas",
        example: "But that's not all... Here's where it gets interesting... And the best part?",
        threshold: 80,
        weight: 3,
        affinity: Affinity::Both,
        rule: RuleKind::Transitions,
    },
    EdictDef {
        id: 13,
        name: "Pattern Interrupts",
        description: "Break up copy with unexpected elements to maintain attention",
        example: "Wait—before you continue reading, I need you to understand something crucial...",
        threshold: 75,
        weight: 2,
        affinity: Affinity::Both,
        rule: RuleKind::PatternInterrupts,
    },
    EdictDef {
        id: 14,
        name: "Storytelling",
        description: "Use narrative elements to engage and relate to the reader",
        example: "When Sarah first came to us, she was skeptical. Three diets had failed her. But within weeks...",
        threshold: 85,
        weight: 4,
        affinity: Affinity::Remote,
        rule: RuleKind::Storytelling,
    },
    EdictDef {
        id: 15,
        name: "Conversational Tone",
        description: "Write as if speaking directly to one person",
        example: "I know exactly how you feel. I've been there too, standing in front of the mirror, wondering if anything will ever work.",
        threshold: 85,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::ConversationalTone,
    },
];

const CONVERSION: &[EdictDef] = &[
    EdictDef {
        id: 16,
        name: "Clear CTA",
        description: "Include explicit calls to action with strong command verbs",
        example: "Click here to claim your risk-free trial now!",
        threshold: 90,
        weight: 5,
        affinity: Affinity::Both,
        rule: RuleKind::CallToAction,
    },
    EdictDef {
        id: 17,
        name: "Urgency & Scarcity",
        description: "Create reasonable urgency without false claims",
        example: "Limited to the first 500 customers. 327 spots already claimed!",
        threshold: 80,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::Urgency,
    },
    EdictDef {
        id: 18,
        name: "Value Proposition",
        description: "Clearly articulate the unique value and benefits",
        example: "Unlike other solutions that only [competitor weakness], our system [unique advantage] to deliver [key benefit].",
        threshold: 85,
        weight: 5,
        affinity: Affinity::Both,
        rule: RuleKind::ValueProposition,
    },
    EdictDef {
        id: 19,
        name: "Future Pacing",
        description: "Help the reader visualize a positive future after using your product",
        example: "Imagine waking up 30 days from now, looking in the mirror, and seeing a noticeably slimmer reflection staring back at you.",
        threshold: 80,
        weight: 4,
        affinity: Affinity::Remote,
        rule: RuleKind::FuturePacing,
    },
    EdictDef {
        id: 20,
        name: "Decision Simplification",
        description: "Make the decision process simple and clear",
        example: "You have two choices: Continue struggling with approaches that haven't worked, or try the proven system that's transformed thousands of lives.",
        threshold: 85,
        weight: 4,
        affinity: Affinity::Both,
        rule: RuleKind::DecisionSimplification,
    },
    EdictDef {
        id: 21,
        name: "Post-Purchase Reassurance",
        description: "Reinforce the decision and reduce buyer's remorse",
        example: "After you click the button, you'll receive immediate access to everything you need, with our team standing by to support your journey.",
        threshold: 75,
        weight: 3,
        affinity: Affinity::Remote,
        rule: RuleKind::Reassurance,
    },
];

const PILLARS: &[PillarDef] = &[
    PillarDef {
        id: 1,
        name: "Clarity & Readability",
        description: "Ensure your copy is easily digestible and understood by your target audience",
        edicts: CLARITY,
    },
    PillarDef {
        id: 2,
        name: "Persuasion & Emotion",
        description: "Trigger emotional responses that drive action",
        edicts: PERSUASION,
    },
    PillarDef {
        id: 3,
        name: "Engagement & Flow",
        description: "Maintain reader interest from start to finish",
        edicts: ENGAGEMENT,
    },
    PillarDef {
        id: 4,
        name: "Call to Action & Conversion",
        description: "Drive readers to take the desired action",
        edicts: CONVERSION,
    },
];

/// Pillars of the built-in rubric, in display order.
pub fn standard_pillars() -> Vec<Pillar> {
    PILLARS
        .iter()
        .map(|p| Pillar {
            id: PillarId(p.id),
            name: p.name.to_string(),
            description: p.description.to_string(),
            edicts: p
                .edicts
                .iter()
                .map(|e| Edict {
                    id: EdictId(e.id),
                    pillar_id: PillarId(p.id),
                    name: e.name.to_string(),
                    description: e.description.to_string(),
                    example: e.example.to_string(),
                    threshold: e.threshold,
                    weight: e.weight,
                    affinity: e.affinity,
                    rule: e.rule,
                })
                .collect(),
        })
        .collect()
}

impl RuleCatalog {
    /// The built-in rubric.
    pub fn standard() -> Self {
        // Consistency of the static table is covered by `standard_catalog_is_consistent`.
        Self::indexed(standard_pillars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_consistent() {
        let catalog = RuleCatalog::from_pillars(standard_pillars()).unwrap();
        assert_eq!(catalog.pillars().len(), 4);
        assert_eq!(catalog.len(), 21);
    }

    #[test]
    fn ids_are_sequential_in_pillar_order() {
        let catalog = RuleCatalog::standard();
        let ids: Vec<u32> = catalog.all_edicts().map(|e| e.id.0).collect();
        assert_eq!(ids, (1..=21).collect::<Vec<_>>());
    }

    #[test]
    fn remote_only_edicts_match_rubric() {
        let catalog = RuleCatalog::standard();
        let remote_only: Vec<u32> = catalog
            .all_edicts()
            .filter(|e| e.affinity == Affinity::Remote)
            .map(|e| e.id.0)
            .collect();
        assert_eq!(remote_only, vec![14, 19, 21]);
    }

    #[test]
    fn every_rule_kind_is_used_once() {
        let catalog = RuleCatalog::standard();
        let mut kinds: Vec<RuleKind> = catalog.all_edicts().map(|e| e.rule).collect();
        let before = kinds.len();
        kinds.sort_by_key(|k| format!("{k:?}"));
        kinds.dedup();
        assert_eq!(kinds.len(), before);
    }

    #[test]
    fn weights_follow_rubric() {
        let catalog = RuleCatalog::standard();
        assert_eq!(catalog.edict(EdictId(2)).unwrap().weight, 5);
        assert_eq!(catalog.edict(EdictId(5)).unwrap().weight, 2);
        assert_eq!(catalog.edict(EdictId(21)).unwrap().weight, 3);
    }
}
