use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::domain::{QuestionId, ScoringMode, SectionDefinition, SectionId, Subgroup, SubgroupName};

/// Read-only lookup of every question group, in declaration order.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<SectionDefinition>,
    index: HashMap<SectionId, usize>,
}

/// Structural problems with section definitions, or lookups of unknown sections.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown section '{0}'")]
    UnknownSection(SectionId),
    #[error("section '{0}' is registered more than once")]
    DuplicateSection(SectionId),
    #[error("section '{0}' needs a positive max score")]
    MissingMaxScore(SectionId),
    #[error("section '{0}' declares no questions")]
    EmptyQuestions(SectionId),
    #[error("section '{0}' declares no subgroups")]
    NoSubgroups(SectionId),
    #[error("subgroup '{subgroup}' of section '{section}' declares no questions")]
    EmptySubgroup {
        section: SectionId,
        subgroup: SubgroupName,
    },
    #[error("subgroup '{subgroup}' is declared twice in section '{section}'")]
    DuplicateSubgroup {
        section: SectionId,
        subgroup: SubgroupName,
    },
    #[error("question '{question}' appears in subgroups '{first}' and '{second}' of section '{section}'")]
    SharedQuestion {
        section: SectionId,
        question: QuestionId,
        first: SubgroupName,
        second: SubgroupName,
    },
    #[error("unable to read section definitions: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse section definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SectionRegistry {
    /// The built-in daily questionnaire.
    pub fn standard() -> Self {
        Self::indexed(standard_sections())
    }

    pub fn from_definitions(sections: Vec<SectionDefinition>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(sections.len());
        for section in &sections {
            validate(section)?;
            if !seen.insert(&section.id) {
                return Err(RegistryError::DuplicateSection(section.id.clone()));
            }
        }

        debug!(sections = sections.len(), "section registry loaded");
        Ok(Self::indexed(sections))
    }

    fn indexed(sections: Vec<SectionDefinition>) -> Self {
        let index = sections
            .iter()
            .enumerate()
            .map(|(position, section)| (section.id.clone(), position))
            .collect();
        Self { sections, index }
    }

    /// Loads a JSON array of section definitions.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let sections: Vec<SectionDefinition> = serde_json::from_reader(reader)?;
        Self::from_definitions(sections)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn get_section(&self, id: &str) -> Result<&SectionDefinition, RegistryError> {
        self.index
            .get(id)
            .map(|position| &self.sections[*position])
            .ok_or_else(|| RegistryError::UnknownSection(SectionId::from(id)))
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionDefinition> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn validate(section: &SectionDefinition) -> Result<(), RegistryError> {
    let id = &section.id;

    if section.mode != ScoringMode::SingleSelect && section.max_score == 0 {
        return Err(RegistryError::MissingMaxScore(id.clone()));
    }

    match section.mode {
        ScoringMode::NumericSum | ScoringMode::StarRating | ScoringMode::SingleSelect => {
            if section.question_ids.is_empty() {
                return Err(RegistryError::EmptyQuestions(id.clone()));
            }
        }
        ScoringMode::SubGrouped => validate_subgroups(id, &section.subgroups)?,
    }

    Ok(())
}

fn validate_subgroups(section: &SectionId, subgroups: &[Subgroup]) -> Result<(), RegistryError> {
    if subgroups.is_empty() {
        return Err(RegistryError::NoSubgroups(section.clone()));
    }

    let mut names = HashSet::new();
    let mut owners: HashMap<&QuestionId, &SubgroupName> = HashMap::new();

    for subgroup in subgroups {
        if !names.insert(&subgroup.name) {
            return Err(RegistryError::DuplicateSubgroup {
                section: section.clone(),
                subgroup: subgroup.name.clone(),
            });
        }
        if subgroup.question_ids.is_empty() {
            return Err(RegistryError::EmptySubgroup {
                section: section.clone(),
                subgroup: subgroup.name.clone(),
            });
        }
        for question in &subgroup.question_ids {
            if let Some(first) = owners.insert(question, &subgroup.name) {
                if first != &subgroup.name {
                    return Err(RegistryError::SharedQuestion {
                        section: section.clone(),
                        question: question.clone(),
                        first: first.clone(),
                        second: subgroup.name.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn standard_sections() -> Vec<SectionDefinition> {
    vec![
        SectionDefinition::numeric("offday", "Off Day", &["off-day"], 1),
        SectionDefinition::numeric(
            "discipline",
            "Daily Discipline",
            &["todo", "nottodo", "routine-morning", "routine-night"],
            4,
        ),
        SectionDefinition::numeric("wisdom", "Wisdom", &["book1-action", "book2-action"], 2),
        SectionDefinition::select("skills", "Skills", &["skill1", "skill2", "skill3"]),
        SectionDefinition::stars(
            "ratings",
            "Ratings",
            &[
                "rating-mood",
                "rating-productivity",
                "rating-health",
                "rating-focus",
                "rating-sleep",
            ],
            25,
        ),
        SectionDefinition::numeric("reflection", "Reflection", &["grat", "dist"], 2),
        SectionDefinition::subgrouped(
            "archetype",
            "Archetypes",
            vec![
                Subgroup::new("king", &["king-q1", "king-q2"]),
                Subgroup::new("warrior", &["warrior-q1", "warrior-q3"]),
                Subgroup::new("sage", &["sage-q1", "sage-q5"]),
                Subgroup::new("scholar", &["scholar-q2", "scholar-q3"]),
            ],
            2,
        ),
    ]
}
