use chrono::NaiveDate;
use daybook::config::AppConfig;
use daybook::error::AppError;
use daybook::journal::{Answers, DayKey, QuestionId, RawAnswer, ScoringMode, SectionDefinition};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses `question=value`; a bare `question` means a checked box.
pub(crate) fn parse_answer_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((question, value)) if !question.trim().is_empty() => {
            Ok((question.trim().to_string(), value.to_string()))
        }
        Some(_) => Err(format!("answer '{raw}' is missing a question id")),
        None if !raw.trim().is_empty() => Ok((raw.trim().to_string(), "on".to_string())),
        None => Err("empty answer".to_string()),
    }
}

/// The explicit date if given, otherwise today per the configured day boundary.
pub(crate) fn day_key(config: &AppConfig, date: Option<NaiveDate>) -> DayKey {
    match date {
        Some(date) => DayKey::new(date),
        None => config.journal.day_boundary.clock().today(),
    }
}

pub(crate) fn section_questions(section: &SectionDefinition) -> Vec<&QuestionId> {
    match section.mode {
        ScoringMode::SubGrouped => section
            .subgroups
            .iter()
            .flat_map(|subgroup| subgroup.question_ids.iter())
            .collect(),
        _ => section.question_ids.iter().collect(),
    }
}

/// Resolves raw widget values against the section's questions and mode.
pub(crate) fn resolve_answers(
    section: &SectionDefinition,
    pairs: &[(String, String)],
) -> Result<Answers, AppError> {
    let questions = section_questions(section);
    let mut answers = Answers::new();

    for (question, value) in pairs {
        let Some(question_id) = questions.iter().find(|id| id.as_str() == question.as_str()) else {
            return Err(AppError::Input(format!(
                "question '{question}' does not belong to section '{}'",
                section.id
            )));
        };
        let answer = RawAnswer::resolve(value, section.mode).ok_or_else(|| {
            AppError::Input(format!(
                "'{value}' is not a weight or checkbox state for question '{question}'"
            ))
        })?;
        answers.insert((*question_id).clone(), answer);
    }

    Ok(answers)
}
