use serde::Serialize;

use super::domain::{DayKey, ScoringMode, SectionId, SubgroupName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionScoreEntry {
    pub section: SectionId,
    pub label: String,
    pub mode: ScoringMode,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeScoreEntry {
    pub section: SectionId,
    pub archetype: SubgroupName,
    pub label: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

/// Presentation-ready view of one day, consumed by renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub day: DayKey,
    pub sections: Vec<SectionScoreEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archetypes: Vec<ArchetypeScoreEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_sections: Vec<SectionId>,
}

impl DailySummary {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.skills.is_empty() && self.archetypes.is_empty()
    }
}
