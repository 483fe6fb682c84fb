use crate::infra::{parse_date, section_questions};
use crate::render::render_summary;
use chrono::NaiveDate;
use clap::Args;
use daybook::config::AppConfig;
use daybook::error::AppError;
use daybook::journal::{
    pages_for, Answers, DayClock, JournalSession, PageContent, RawAnswer, ScoringMode,
    SectionDefinition,
};
use std::io::{self, BufRead, Write};

#[derive(Args, Debug, Default)]
pub(crate) struct FillArgs {
    /// Record against this day instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) enum Prompted {
    Answers(Answers),
    Back,
}

const BACK_COMMAND: &str = ":back";

pub(crate) fn run_fill(config: &AppConfig, args: FillArgs) -> Result<(), AppError> {
    let registry = config.journal.registry()?;
    let clock = match args.date {
        Some(date) => DayClock::Fixed(date),
        None => config.journal.day_boundary.clock(),
    };
    let mut session = JournalSession::new(
        &registry,
        config.storage.open_store(),
        pages_for(&registry),
        clock,
    )?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    writeln!(
        output,
        "Daily journal for {} (blank = skip, '{}' = previous page)",
        clock.today(),
        BACK_COMMAND
    )?;

    let mut view = session.view();
    loop {
        let section = match &view.content {
            PageContent::Summary { summary } => {
                render_summary(summary);
                return Ok(());
            }
            PageContent::Questions { section, saved } => {
                let definition = registry.get_section(section.as_str())?;
                writeln!(output, "\n{} ({})", definition.label, view.page_id)?;
                if saved.is_some() {
                    writeln!(output, "  already saved today; answering again replaces it")?;
                }
                definition
            }
        };

        view = match prompt_section(section, &mut input, &mut output)? {
            Prompted::Back => session.go_back(),
            Prompted::Answers(answers) => session.advance(&answers)?,
        };
    }
}

/// Asks every question of `section`, re-asking on values the mode cannot use.
pub(crate) fn prompt_section<R: BufRead, W: Write>(
    section: &SectionDefinition,
    input: &mut R,
    output: &mut W,
) -> Result<Prompted, AppError> {
    let mut answers = Answers::new();

    for question in section_questions(section) {
        loop {
            write!(output, "  {} [{}]: ", question, hint(section.mode))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(Prompted::Answers(answers));
            }
            let value = line.trim_end_matches(['\r', '\n']);

            if value.trim() == BACK_COMMAND {
                return Ok(Prompted::Back);
            }
            if value.trim().is_empty() {
                break;
            }
            match RawAnswer::resolve(value, section.mode) {
                Some(answer) => {
                    answers.insert(question.clone(), answer);
                    break;
                }
                None => writeln!(output, "  '{}' is not a number or yes/no", value.trim())?,
            }
        }
    }

    Ok(Prompted::Answers(answers))
}

fn hint(mode: ScoringMode) -> &'static str {
    match mode {
        ScoringMode::NumericSum | ScoringMode::SubGrouped => "weight or yes/no",
        ScoringMode::StarRating => "0-5 stars",
        ScoringMode::SingleSelect => "text",
    }
}
