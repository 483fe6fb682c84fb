use crate::infra::{day_key, parse_answer_pair, parse_date, resolve_answers};
use crate::render::{render_sections, render_summary};
use chrono::NaiveDate;
use clap::Args;
use daybook::config::AppConfig;
use daybook::error::AppError;
use daybook::journal::{project, score, SectionResult};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct RecordArgs {
    /// Section to score (see `daybook sections`)
    pub(crate) section: String,
    /// Answer as question=value; a bare question id marks a checkbox
    #[arg(long = "answer", short = 'a', value_parser = parse_answer_pair)]
    pub(crate) answers: Vec<(String, String)>,
    /// Day to record against (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct DayArgs {
    /// Day to print (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Day to summarize (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Emit the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_record(config: &AppConfig, args: RecordArgs) -> Result<(), AppError> {
    let RecordArgs {
        section,
        answers,
        date,
    } = args;

    let registry = config.journal.registry()?;
    let section = registry.get_section(&section)?;
    let answers = resolve_answers(section, &answers)?;
    let day = day_key(config, date);

    let result = score(section, &answers);
    config.storage.open_store().save(day, &section.id, result.clone())?;
    info!(%day, section = %section.id, answered = answers.len(), "section recorded");

    match &result {
        SectionResult::Scored(scored) => println!(
            "{} on {}: {}/{} ({}%)",
            section.label, day, scored.score, scored.max_score, scored.percentage
        ),
        SectionResult::Subgroups(groups) => {
            println!("{} on {}", section.label, day);
            for (name, scored) in groups.iter() {
                println!("- {}: {}/{}", name, scored.score, scored.max_score);
            }
        }
        SectionResult::Selections(values) => {
            println!("{} on {}", section.label, day);
            for (question, value) in values.iter() {
                println!("- {}: {}", question, value);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_day(config: &AppConfig, args: DayArgs) -> Result<(), AppError> {
    let day = day_key(config, args.date);
    let record = config.storage.open_store().get_day(day);
    let body = serde_json::to_string_pretty(&record)?;
    println!("{body}");
    Ok(())
}

pub(crate) fn run_summary(config: &AppConfig, args: SummaryArgs) -> Result<(), AppError> {
    let registry = config.journal.registry()?;
    let day = day_key(config, args.date);
    let record = config.storage.open_store().get_day(day);
    let summary = project(&registry, day, &record);

    if args.json {
        let body = serde_json::to_string_pretty(&summary)?;
        println!("{body}");
    } else {
        render_summary(&summary);
    }
    Ok(())
}

pub(crate) fn run_history(config: &AppConfig) -> Result<(), AppError> {
    let days = config.storage.open_store().recorded_days();
    if days.is_empty() {
        println!("No days recorded yet.");
    } else {
        for day in days {
            println!("{day}");
        }
    }
    Ok(())
}

pub(crate) fn run_sections(config: &AppConfig) -> Result<(), AppError> {
    let registry = config.journal.registry()?;
    render_sections(&registry);
    Ok(())
}
