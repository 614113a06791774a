//! Rule catalog: pillars, edicts and id lookup.
//!
//! The catalog is built once and is read-only afterwards. Lookup by id goes
//! through a `BTreeMap` index so it is O(log n) and iterates in id order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct EdictId(pub u32);

impl fmt::Display for EdictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:02}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PillarId(pub u32);

impl fmt::Display for PillarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Which validator is allowed to score an edict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    #[serde(alias = "client")]
    Local,
    #[serde(alias = "ai")]
    Remote,
    Both,
}

impl Affinity {
    pub fn is_local(self) -> bool {
        matches!(self, Affinity::Local | Affinity::Both)
    }

    pub fn is_remote(self) -> bool {
        matches!(self, Affinity::Remote | Affinity::Both)
    }
}

/// Heuristic used to score an edict. One variant per analyzer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    SentenceLength,
    Readability,
    Structure,
    ActiveVoice,
    CommaRhythm,
    EmotionalTriggers,
    PainSolution,
    Specificity,
    Credibility,
    RiskReversal,
    OpeningHook,
    Transitions,
    PatternInterrupts,
    Storytelling,
    ConversationalTone,
    CallToAction,
    Urgency,
    ValueProposition,
    FuturePacing,
    DecisionSimplification,
    Reassurance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edict {
    pub id: EdictId,
    pub pillar_id: PillarId,
    pub name: String,
    pub description: String,
    pub example: String,
    /// Minimum sub-score to pass, 0..=100.
    pub threshold: u8,
    /// Relative importance in the weighted total. Always positive.
    pub weight: u32,
    pub affinity: Affinity,
    pub rule: RuleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pillar {
    pub id: PillarId,
    pub name: String,
    pub description: String,
    pub edicts: Vec<Edict>,
}

/// Read-only registry of pillars and their edicts.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    pillars: Vec<Pillar>,
    /// Edict id -> (pillar index, edict index).
    index: BTreeMap<EdictId, (usize, usize)>,
}

impl RuleCatalog {
    /// Build a catalog, rejecting zero or duplicate ids, misfiled edicts and
    /// out-of-range thresholds or weights.
    pub fn from_pillars(pillars: Vec<Pillar>) -> Result<Self, CatalogError> {
        let mut seen_edicts = BTreeSet::new();
        let mut seen_pillars = BTreeSet::new();

        for pillar in &pillars {
            if pillar.id.0 == 0 {
                return Err(CatalogError::ZeroPillarId);
            }
            if !seen_pillars.insert(pillar.id) {
                return Err(CatalogError::DuplicatePillar(pillar.id));
            }
            for edict in &pillar.edicts {
                if edict.id.0 == 0 {
                    return Err(CatalogError::ZeroEdictId(pillar.id));
                }
                if edict.pillar_id != pillar.id {
                    return Err(CatalogError::PillarMismatch {
                        edict: edict.id,
                        declared: edict.pillar_id,
                        listed: pillar.id,
                    });
                }
                if edict.threshold > 100 {
                    return Err(CatalogError::ThresholdOutOfRange(edict.id));
                }
                if edict.weight == 0 {
                    return Err(CatalogError::ZeroWeight(edict.id));
                }
                if !seen_edicts.insert(edict.id) {
                    return Err(CatalogError::DuplicateEdict(edict.id));
                }
            }
        }

        Ok(Self::indexed(pillars))
    }

    pub(crate) fn indexed(pillars: Vec<Pillar>) -> Self {
        let mut index = BTreeMap::new();
        for (pi, pillar) in pillars.iter().enumerate() {
            for (ei, edict) in pillar.edicts.iter().enumerate() {
                index.insert(edict.id, (pi, ei));
            }
        }
        Self { pillars, index }
    }

    pub fn empty() -> Self {
        Self {
            pillars: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    pub fn edict(&self, id: EdictId) -> Result<&Edict, CatalogError> {
        self.index
            .get(&id)
            .map(|&(pi, ei)| &self.pillars[pi].edicts[ei])
            .ok_or(CatalogError::UnknownEdict(id))
    }

    pub fn contains(&self, id: EdictId) -> bool {
        self.index.contains_key(&id)
    }

    /// All edicts in pillar order.
    pub fn all_edicts(&self) -> impl Iterator<Item = &Edict> {
        self.pillars.iter().flat_map(|p| p.edicts.iter())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
