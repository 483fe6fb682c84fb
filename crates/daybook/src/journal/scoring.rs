use tracing::{debug, warn};

use super::archetype::score_subgroups;
use super::domain::{
    Answers, OrderedMap, QuestionId, RawAnswer, ScoreResult, ScoringMode, SectionDefinition,
    SectionResult,
};

/// Scores one section's answers according to its mode.
///
/// Unanswered questions contribute nothing; they never fail scoring.
pub fn score(section: &SectionDefinition, answers: &Answers) -> SectionResult {
    let result = match section.mode {
        ScoringMode::NumericSum | ScoringMode::StarRating => SectionResult::Scored(numeric_sum(
            section,
            &section.question_ids,
            section.max_score,
            answers,
        )),
        ScoringMode::SingleSelect => SectionResult::Selections(select_values(section, answers)),
        ScoringMode::SubGrouped => SectionResult::Subgroups(score_subgroups(section, answers)),
    };

    debug!(section = %section.id, mode = section.mode.label(), "section scored");
    result
}

pub(crate) fn numeric_sum(
    section: &SectionDefinition,
    question_ids: &[QuestionId],
    max_score: u32,
    answers: &Answers,
) -> ScoreResult {
    let mut total: u32 = 0;

    for question in question_ids {
        let weight = match answers.get(question) {
            Some(RawAnswer::Weight(weight)) => *weight,
            Some(RawAnswer::Presence(true)) => 1,
            Some(RawAnswer::Presence(false)) | None => 0,
            Some(RawAnswer::Text(_)) => {
                debug!(section = %section.id, question = %question, "ignoring text answer in scored section");
                0
            }
        };
        total = total.saturating_add(weight);
    }

    if total > max_score {
        warn!(
            section = %section.id,
            score = total,
            max_score,
            "answer weights exceed the section maximum; clamping"
        );
    }

    ScoreResult::new(total, max_score)
}

fn select_values(section: &SectionDefinition, answers: &Answers) -> OrderedMap<QuestionId, String> {
    section
        .question_ids
        .iter()
        .map(|question| {
            let value = match answers.get(question) {
                Some(RawAnswer::Text(value)) => value.clone(),
                Some(_) => {
                    debug!(section = %section.id, question = %question, "ignoring non-text answer in select section");
                    String::new()
                }
                None => String::new(),
            };
            (question.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::registry::SectionRegistry;

    fn section(id: &str) -> SectionDefinition {
        SectionRegistry::standard()
            .get_section(id)
            .expect("standard section")
            .clone()
    }

    #[test]
    fn empty_answers_score_zero_for_every_numeric_section() {
        let registry = SectionRegistry::standard();
        for section in registry.sections().filter(|section| section.mode.is_numeric()) {
            let result = score(section, &Answers::new());
            assert_eq!(
                result,
                SectionResult::Scored(ScoreResult {
                    score: 0,
                    max_score: section.max_score,
                    percentage: 0,
                }),
                "section {} should score zero",
                section.id
            );
        }
    }

    #[test]
    fn fully_checked_discipline_reaches_one_hundred_percent() {
        let discipline = section("discipline");
        let answers = Answers::new()
            .weight("todo", 1)
            .weight("nottodo", 1)
            .checked("routine-morning")
            .checked("routine-night");

        let result = score(&discipline, &answers);

        let scored = result.as_scored().expect("numeric result");
        assert_eq!(scored.score, 4);
        assert_eq!(scored.percentage, 100);
    }

    #[test]
    fn star_ratings_sum_their_weights() {
        let ratings = section("ratings");
        let answers = Answers::new()
            .weight("rating-mood", 4)
            .weight("rating-productivity", 3)
            .weight("rating-health", 5)
            .weight("rating-focus", 2)
            .weight("rating-sleep", 4);

        let result = score(&ratings, &answers);

        assert_eq!(
            result,
            SectionResult::Scored(ScoreResult {
                score: 18,
                max_score: 25,
                percentage: 72,
            })
        );
    }

    #[test]
    fn partial_answers_round_to_nearest_percent() {
        let habits = SectionDefinition::numeric("habits", "Habits", &["walk", "read", "stretch"], 3);
        let result = score(&habits, &Answers::new().checked("read"));
        assert_eq!(result.as_scored().map(|scored| scored.percentage), Some(33));
    }

    #[test]
    fn unchecked_boxes_and_text_contribute_nothing() {
        let reflection = section("reflection");
        let answers = Answers::new()
            .with("grat", RawAnswer::Presence(false))
            .text("dist", "sort of");

        let result = score(&reflection, &answers);

        assert_eq!(result.as_scored().map(|scored| scored.score), Some(0));
    }

    #[test]
    fn answers_outside_the_section_are_ignored() {
        let wisdom = section("wisdom");
        let answers = Answers::new().weight("book1-action", 1).weight("todo", 1);
        let result = score(&wisdom, &answers);
        assert_eq!(result.as_scored().map(|scored| scored.score), Some(1));
    }

    #[test]
    fn overweight_answers_are_clamped_to_max_score() {
        let offday = section("offday");
        let result = score(&offday, &Answers::new().weight("off-day", 7));
        let scored = result.as_scored().expect("numeric result");
        assert_eq!(scored.score, 1);
        assert_eq!(scored.percentage, 100);
    }

    #[test]
    fn select_sections_capture_every_declared_question() {
        let skills = section("skills");
        let answers = Answers::new().text("skill1", "Rust").weight("skill3", 2);

        let result = score(&skills, &answers);

        let values = result.as_selections().expect("selection result");
        let collected: Vec<(&str, &str)> = values
            .iter()
            .map(|(question, value)| (question.as_str(), value.as_str()))
            .collect();
        assert_eq!(
            collected,
            vec![("skill1", "Rust"), ("skill2", ""), ("skill3", "")]
        );
    }
}
