use crate::commands::{
    run_day, run_history, run_record, run_sections, run_summary, DayArgs, RecordArgs, SummaryArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::prompt::{run_fill, FillArgs};
use clap::{Parser, Subcommand};
use daybook::config::AppConfig;
use daybook::error::AppError;
use daybook::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "daybook",
    about = "Score, record, and review a daily self-tracking journal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through today's questionnaire page by page (default command)
    Fill(FillArgs),
    /// Score and save a single section
    Record(RecordArgs),
    /// Print the raw record saved for a day as JSON
    Day(DayArgs),
    /// Summarize a day's scores, skills, and archetypes
    Summary(SummaryArgs),
    /// List every day that has saved sections
    History,
    /// List the registered sections and their questions
    Sections,
    /// Run a scripted questionnaire against an in-memory journal
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, data_dir = %config.storage.data_dir.display(), "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Fill(FillArgs::default()));

    match command {
        Command::Fill(args) => run_fill(&config, args),
        Command::Record(args) => run_record(&config, args),
        Command::Day(args) => run_day(&config, args),
        Command::Summary(args) => run_summary(&config, args),
        Command::History => run_history(&config),
        Command::Sections => run_sections(&config),
        Command::Demo(args) => run_demo(&config, args),
    }
}
