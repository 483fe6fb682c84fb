//! Scoring, aggregation, and day-keyed persistence for the daily journal.
//!
//! Rendering is left to callers: they collect answers through [`AnswerSource`],
//! drive a [`JournalSession`], and draw the [`DailySummary`] it projects.

mod archetype;
pub mod domain;
mod registry;
mod scoring;
mod session;
mod store;
mod summary;
pub mod views;

pub use archetype::score_subgroups;
pub use domain::{
    percentage, Answers, DayKey, DayRecord, JournalStore, OrderedMap, QuestionId, RawAnswer,
    ScoreResult, ScoringMode, SectionDefinition, SectionId, SectionResult, Subgroup, SubgroupName,
};
pub use registry::{RegistryError, SectionRegistry};
pub use scoring::score;
pub use session::{
    pages_for, standard_pages, AnswerSource, DayClock, JournalSession, Page, PageContent, PageView,
    SessionError, SUMMARY_PAGE_ID,
};
pub use store::{DayRecordStore, FileBackend, MemoryBackend, StorageBackend, StoreError};
pub use summary::project;
pub use views::{ArchetypeScoreEntry, DailySummary, SectionScoreEntry};
