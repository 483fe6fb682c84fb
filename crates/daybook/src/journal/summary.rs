use tracing::debug;

use super::domain::{DayKey, DayRecord, ScoringMode, SectionDefinition};
use super::registry::SectionRegistry;
use super::views::{ArchetypeScoreEntry, DailySummary, SectionScoreEntry};

/// Builds the summary views for one day's record without modifying it.
pub fn project(registry: &SectionRegistry, day: DayKey, record: &DayRecord) -> DailySummary {
    let mut sections = Vec::new();
    let mut skills = Vec::new();
    let mut archetypes = Vec::new();
    let mut pending_sections = Vec::new();

    for section in registry.sections() {
        let Some(result) = record.get(&section.id) else {
            pending_sections.push(section.id.clone());
            continue;
        };

        match section.mode {
            ScoringMode::NumericSum | ScoringMode::StarRating => match result.as_scored() {
                Some(scored) => sections.push(SectionScoreEntry {
                    section: section.id.clone(),
                    label: section.label.clone(),
                    mode: section.mode,
                    score: scored.score,
                    max_score: scored.max_score,
                    percentage: scored.percentage,
                }),
                None => mismatched(section),
            },
            ScoringMode::SingleSelect => match result.as_selections() {
                Some(values) => skills.extend(
                    values
                        .iter()
                        .map(|(_, value)| value.trim())
                        .filter(|value| !value.is_empty())
                        .map(str::to_string),
                ),
                None => mismatched(section),
            },
            ScoringMode::SubGrouped => match result.as_subgroups() {
                Some(groups) => archetypes.extend(groups.iter().map(|(name, scored)| {
                    ArchetypeScoreEntry {
                        section: section.id.clone(),
                        archetype: name.clone(),
                        label: capitalize(name.as_str()),
                        score: scored.score,
                        max_score: scored.max_score,
                        percentage: scored.percentage,
                    }
                })),
                None => mismatched(section),
            },
        }
    }

    DailySummary {
        day,
        sections,
        skills,
        archetypes,
        pending_sections,
    }
}

fn mismatched(section: &SectionDefinition) {
    debug!(section = %section.id, mode = section.mode.label(), "stored result does not match section mode; skipped");
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
