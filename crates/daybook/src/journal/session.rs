use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Answers, DayKey, SectionDefinition, SectionId, SectionResult};
use super::registry::{RegistryError, SectionRegistry};
use super::scoring::score;
use super::store::{DayRecordStore, StorageBackend, StoreError};
use super::summary::project;
use super::views::DailySummary;

/// Where the day key comes from when a section is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClock {
    Utc,
    Local,
    Fixed(NaiveDate),
}

impl DayClock {
    pub fn today(self) -> DayKey {
        match self {
            Self::Utc => DayKey::new(Utc::now().date_naive()),
            Self::Local => DayKey::new(Local::now().date_naive()),
            Self::Fixed(date) => DayKey::new(date),
        }
    }
}

/// Supplies answers for a section when the user leaves its page.
pub trait AnswerSource {
    fn collect_answers(&self, section: &SectionDefinition) -> Answers;
}

/// Answers already gathered for the page being left.
impl AnswerSource for Answers {
    fn collect_answers(&self, _section: &SectionDefinition) -> Answers {
        self.clone()
    }
}

impl AnswerSource for HashMap<SectionId, Answers> {
    fn collect_answers(&self, section: &SectionDefinition) -> Answers {
        self.get(&section.id).cloned().unwrap_or_default()
    }
}

/// One screen of the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub section: Option<SectionId>,
}

impl Page {
    pub fn questions(id: &str, section: &str) -> Self {
        Self {
            id: id.to_string(),
            section: Some(SectionId::from(section)),
        }
    }

    pub fn summary(id: &str) -> Self {
        Self {
            id: id.to_string(),
            section: None,
        }
    }
}

pub const SUMMARY_PAGE_ID: &str = "summary-insight";

/// Page flow of the built-in questionnaire.
pub fn standard_pages() -> Vec<Page> {
    vec![
        Page::questions("page-1", "offday"),
        Page::questions("page-2", "discipline"),
        Page::questions("page-3", "wisdom"),
        Page::questions("page-4", "skills"),
        Page::questions("page-5", "ratings"),
        Page::questions("page-6", "reflection"),
        Page::questions("page-7", "archetype"),
        Page::summary(SUMMARY_PAGE_ID),
    ]
}

/// One page per registered section in declaration order, then the summary.
pub fn pages_for(registry: &SectionRegistry) -> Vec<Page> {
    registry
        .sections()
        .enumerate()
        .map(|(position, section)| {
            Page::questions(&format!("page-{}", position + 1), section.id.as_str())
        })
        .chain(std::iter::once(Page::summary(SUMMARY_PAGE_ID)))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("a session needs at least one page")]
    NoPages,
}

/// What the renderer should show after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PageContent {
    /// A question page, with whatever was already saved for it today.
    Questions {
        section: SectionId,
        #[serde(skip_serializing_if = "Option::is_none")]
        saved: Option<SectionResult>,
    },
    /// A page without questions; carries the day's projected summary.
    Summary { summary: DailySummary },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub index: usize,
    pub page_id: String,
    pub content: PageContent,
}

/// Navigation controller holding the current page and the journal store.
pub struct JournalSession<'r, B> {
    registry: &'r SectionRegistry,
    store: DayRecordStore<B>,
    pages: Vec<Page>,
    current: usize,
    clock: DayClock,
}

impl<'r, B: StorageBackend> JournalSession<'r, B> {
    /// Fails if a page refers to a section missing from the registry.
    pub fn new(
        registry: &'r SectionRegistry,
        store: DayRecordStore<B>,
        pages: Vec<Page>,
        clock: DayClock,
    ) -> Result<Self, SessionError> {
        if pages.is_empty() {
            return Err(SessionError::NoPages);
        }
        for section in pages.iter().filter_map(|page| page.section.as_ref()) {
            registry.get_section(section.as_str())?;
        }

        Ok(Self {
            registry,
            store,
            pages,
            current: 0,
            clock,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn store(&self) -> &DayRecordStore<B> {
        &self.store
    }

    pub fn is_finished(&self) -> bool {
        self.current + 1 == self.pages.len()
    }

    /// Saves the current page's section, then moves to the next page.
    ///
    /// On the last page nothing moves; the section (if any) is still saved.
    pub fn advance(&mut self, answers: &dyn AnswerSource) -> Result<PageView, SessionError> {
        let day = self.clock.today();
        if let Some(section_id) = self.current_page().section.clone() {
            let section = self.registry.get_section(section_id.as_str())?;
            let result = score(section, &answers.collect_answers(section));
            self.store.save(day, &section_id, result)?;
        }

        if self.current + 1 < self.pages.len() {
            self.current += 1;
        }
        info!(page = %self.current_page().id, index = self.current, "advanced");
        Ok(self.view_for(day))
    }

    pub fn go_back(&mut self) -> PageView {
        self.current = self.current.saturating_sub(1);
        debug!(page = %self.current_page().id, index = self.current, "went back");
        self.view()
    }

    /// Renders the current page against today's record.
    pub fn view(&self) -> PageView {
        self.view_for(self.clock.today())
    }

    fn view_for(&self, day: DayKey) -> PageView {
        let page = self.current_page();
        let record = self.store.get_day(day);

        let content = match &page.section {
            Some(section) => PageContent::Questions {
                section: section.clone(),
                saved: record.get(section).cloned(),
            },
            None => PageContent::Summary {
                summary: project(self.registry, day, &record),
            },
        };

        PageView {
            index: self.current,
            page_id: page.id.clone(),
            content,
        }
    }
}
