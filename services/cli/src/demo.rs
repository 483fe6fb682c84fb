use crate::infra::parse_date;
use crate::render::render_summary;
use chrono::NaiveDate;
use clap::Args;
use daybook::config::AppConfig;
use daybook::error::AppError;
use daybook::journal::{
    standard_pages, Answers, DayClock, DayRecordStore, JournalSession, MemoryBackend, PageContent,
    SectionId, SectionRegistry,
};
use std::collections::HashMap;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day to simulate (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the persisted journal blob after the walkthrough.
    #[arg(long)]
    pub(crate) show_blob: bool,
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { date, show_blob } = args;

    let registry = SectionRegistry::standard();
    let clock = match date {
        Some(date) => DayClock::Fixed(date),
        None => config.journal.day_boundary.clock(),
    };
    let mut session = JournalSession::new(
        &registry,
        DayRecordStore::new(MemoryBackend::new()),
        standard_pages(),
        clock,
    )?;

    println!("Daily journal demo ({})", clock.today());
    let answers = scripted_answers();

    let mut view = session.view();
    loop {
        if let PageContent::Summary { summary } = &view.content {
            println!();
            render_summary(summary);
            break;
        }
        if let PageContent::Questions { section, .. } = &view.content {
            println!("- {} ({}) answered", view.page_id, section);
        }
        view = session.advance(&answers)?;
    }

    if show_blob {
        let blob = session.store().backend().blob().unwrap_or_default();
        println!("\nPersisted journal\n{blob}");
    }

    Ok(())
}

pub(crate) fn scripted_answers() -> HashMap<SectionId, Answers> {
    let mut answers = HashMap::new();
    answers.insert(SectionId::from("offday"), Answers::new());
    answers.insert(
        SectionId::from("discipline"),
        Answers::new()
            .weight("todo", 1)
            .weight("nottodo", 1)
            .checked("routine-morning"),
    );
    answers.insert(
        SectionId::from("wisdom"),
        Answers::new().weight("book1-action", 1).weight("book2-action", 1),
    );
    answers.insert(
        SectionId::from("skills"),
        Answers::new()
            .text("skill1", "Spanish vocabulary")
            .text("skill2", "Sketching")
            .text("skill3", ""),
    );
    answers.insert(
        SectionId::from("ratings"),
        Answers::new()
            .weight("rating-mood", 4)
            .weight("rating-productivity", 3)
            .weight("rating-health", 5)
            .weight("rating-focus", 2)
            .weight("rating-sleep", 4),
    );
    answers.insert(SectionId::from("reflection"), Answers::new().checked("grat"));
    answers.insert(
        SectionId::from("archetype"),
        Answers::new()
            .checked("king-q1")
            .checked("warrior-q1")
            .checked("warrior-q3")
            .checked("sage-q5"),
    );
    answers
}
