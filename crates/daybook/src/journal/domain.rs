use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a single answerable item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

/// Identifier of a registered question group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

/// Name of a sub-group inside a sub-grouped section (e.g. an archetype).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubgroupName(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(QuestionId);
string_id!(SectionId);
string_id!(SubgroupName);

/// How a section turns its answers into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    NumericSum,
    StarRating,
    SingleSelect,
    SubGrouped,
}

impl ScoringMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NumericSum => "Checklist",
            Self::StarRating => "Star Rating",
            Self::SingleSelect => "Selection",
            Self::SubGrouped => "Sub-grouped",
        }
    }

    /// Modes producing a single `ScoreResult`.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::NumericSum | Self::StarRating)
    }
}

/// Named list of questions scored independently inside a sub-grouped section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgroup {
    pub name: SubgroupName,
    pub question_ids: Vec<QuestionId>,
}

impl Subgroup {
    pub fn new(name: &str, question_ids: &[&str]) -> Self {
        Self {
            name: SubgroupName::from(name),
            question_ids: question_ids.iter().copied().map(QuestionId::from).collect(),
        }
    }
}

/// Static description of one question group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: SectionId,
    pub label: String,
    #[serde(default)]
    pub question_ids: Vec<QuestionId>,
    #[serde(default)]
    pub max_score: u32,
    pub mode: ScoringMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subgroups: Vec<Subgroup>,
}

impl SectionDefinition {
    fn with_mode(
        id: &str,
        label: &str,
        question_ids: &[&str],
        max_score: u32,
        mode: ScoringMode,
    ) -> Self {
        Self {
            id: SectionId::from(id),
            label: label.to_string(),
            question_ids: question_ids.iter().copied().map(QuestionId::from).collect(),
            max_score,
            mode,
            subgroups: Vec::new(),
        }
    }

    pub fn numeric(id: &str, label: &str, question_ids: &[&str], max_score: u32) -> Self {
        Self::with_mode(id, label, question_ids, max_score, ScoringMode::NumericSum)
    }

    pub fn stars(id: &str, label: &str, question_ids: &[&str], max_score: u32) -> Self {
        Self::with_mode(id, label, question_ids, max_score, ScoringMode::StarRating)
    }

    pub fn select(id: &str, label: &str, question_ids: &[&str]) -> Self {
        Self::with_mode(id, label, question_ids, 0, ScoringMode::SingleSelect)
    }

    pub fn subgrouped(id: &str, label: &str, subgroups: Vec<Subgroup>, max_score: u32) -> Self {
        Self {
            id: SectionId::from(id),
            label: label.to_string(),
            question_ids: Vec::new(),
            max_score,
            mode: ScoringMode::SubGrouped,
            subgroups,
        }
    }
}

/// One answer as collected by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RawAnswer {
    /// Radio-style choice carrying its assigned weight.
    Weight(u32),
    /// Checkbox-style flag; a checked box weighs 1.
    Presence(bool),
    /// Select or free-text value.
    Text(String),
}

impl RawAnswer {
    /// Interprets a raw widget value according to the section's mode.
    ///
    /// Returns `None` when a numeric section receives something that is neither
    /// a weight nor a checkbox state.
    pub fn resolve(raw: &str, mode: ScoringMode) -> Option<Self> {
        match mode {
            ScoringMode::SingleSelect => Some(Self::Text(raw.to_string())),
            ScoringMode::NumericSum | ScoringMode::StarRating | ScoringMode::SubGrouped => {
                let value = raw.trim();
                if let Ok(weight) = value.parse::<u32>() {
                    return Some(Self::Weight(weight));
                }
                match value.to_ascii_lowercase().as_str() {
                    "on" | "yes" | "true" | "checked" | "x" => Some(Self::Presence(true)),
                    "off" | "no" | "false" | "" => Some(Self::Presence(false)),
                    _ => None,
                }
            }
        }
    }
}

/// Answers for one section, keyed by question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(HashMap<QuestionId, RawAnswer>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question: &str, answer: RawAnswer) -> Self {
        self.insert(QuestionId::from(question), answer);
        self
    }

    pub fn weight(self, question: &str, weight: u32) -> Self {
        self.with(question, RawAnswer::Weight(weight))
    }

    pub fn checked(self, question: &str) -> Self {
        self.with(question, RawAnswer::Presence(true))
    }

    pub fn text(self, question: &str, value: &str) -> Self {
        self.with(question, RawAnswer::Text(value.to_string()))
    }

    pub fn insert(&mut self, question: QuestionId, answer: RawAnswer) -> Option<RawAnswer> {
        self.0.insert(question, answer)
    }

    pub fn get(&self, question: &QuestionId) -> Option<&RawAnswer> {
        self.0.get(question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(QuestionId, RawAnswer)> for Answers {
    fn from_iter<T: IntoIterator<Item = (QuestionId, RawAnswer)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalized numeric outcome of a section or sub-group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

impl ScoreResult {
    /// Builds a result, clamping `score` to `max_score`.
    ///
    /// `max_score` must be positive; the registry rejects definitions where it is not.
    pub fn new(score: u32, max_score: u32) -> Self {
        let score = score.min(max_score);
        Self {
            score,
            max_score,
            percentage: percentage(score, max_score),
        }
    }
}

/// `round(100 * score / max_score)`, halves rounded up.
pub fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    let score = u64::from(score);
    let max_score = u64::from(max_score);
    ((200 * score + max_score) / (2 * max_score)) as u32
}

/// Map that keeps insertion order when serialized as a JSON object.
pub type OrderedMap<K, V> = IndexMap<K, V>;

/// Scored output of one section for one day.
///
/// Serialized without a tag so the persisted blob keeps the plain
/// `{score, maxScore, percentage}` / `{question: value}` / `{subgroup: {...}}` shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionResult {
    Scored(ScoreResult),
    Subgroups(OrderedMap<SubgroupName, ScoreResult>),
    Selections(OrderedMap<QuestionId, String>),
}

impl SectionResult {
    pub fn as_scored(&self) -> Option<&ScoreResult> {
        match self {
            Self::Scored(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_subgroups(&self) -> Option<&OrderedMap<SubgroupName, ScoreResult>> {
        match self {
            Self::Subgroups(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn as_selections(&self) -> Option<&OrderedMap<QuestionId, String>> {
        match self {
            Self::Selections(values) => Some(values),
            _ => None,
        }
    }
}

/// Calendar day a record belongs to, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(raw.trim(), Self::FORMAT).map(Self)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// All section results saved for one day.
pub type DayRecord = BTreeMap<SectionId, SectionResult>;

/// Every persisted day; the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalStore {
    days: BTreeMap<DayKey, DayRecord>,
}

impl JournalStore {
    pub fn day(&self, day: DayKey) -> Option<&DayRecord> {
        self.days.get(&day)
    }

    /// Returns the record for `day`, creating an empty one first if needed.
    pub fn day_mut(&mut self, day: DayKey) -> &mut DayRecord {
        self.days.entry(day).or_default()
    }

    pub fn days(&self) -> impl Iterator<Item = (&DayKey, &DayRecord)> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
