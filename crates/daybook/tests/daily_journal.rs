use std::collections::HashMap;
use std::fs;

use chrono::NaiveDate;
use daybook::journal::{
    project, score, standard_pages, Answers, DayClock, DayKey, DayRecordStore, FileBackend,
    JournalSession, PageContent, ScoreResult, SectionDefinition, SectionId, SectionRegistry,
    SectionResult, Subgroup,
};

fn journal_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid journal day")
}

fn full_day_answers() -> HashMap<SectionId, Answers> {
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
        Answers::new().weight("book1-action", 1),
    );
    answers.insert(
        SectionId::from("skills"),
        Answers::new().text("skill1", "Piano").text("skill2", ""),
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
    answers.insert(
        SectionId::from("reflection"),
        Answers::new().checked("grat").checked("dist"),
    );
    answers.insert(
        SectionId::from("archetype"),
        Answers::new()
            .checked("king-q1")
            .checked("king-q2")
            .checked("sage-q1"),
    );
    answers
}

#[test]
fn full_questionnaire_persists_and_summarizes_one_day() {
    let dir = tempfile::tempdir().expect("temp dir");
    let registry = SectionRegistry::standard();
    let store = DayRecordStore::new(FileBackend::new(dir.path(), "trackerData"));
    let mut session = JournalSession::new(
        &registry,
        store,
        standard_pages(),
        DayClock::Fixed(journal_day()),
    )
    .expect("session starts");

    let answers = full_day_answers();
    let mut view = session.view();
    while !session.is_finished() {
        view = session.advance(&answers).expect("page advances");
    }

    let summary = match view.content {
        PageContent::Summary { summary } => summary,
        other => panic!("expected summary page, got {other:?}"),
    };

    let percentages: Vec<(&str, u32)> = summary
        .sections
        .iter()
        .map(|entry| (entry.section.as_str(), entry.percentage))
        .collect();
    assert_eq!(
        percentages,
        vec![
            ("offday", 0),
            ("discipline", 75),
            ("wisdom", 50),
            ("ratings", 72),
            ("reflection", 100),
        ]
    );
    assert_eq!(summary.skills, vec!["Piano".to_string()]);
    let king = summary
        .archetypes
        .iter()
        .find(|entry| entry.archetype.as_str() == "king")
        .expect("king scored");
    assert_eq!((king.score, king.max_score), (2, 2));

    let blob = fs::read_to_string(dir.path().join("trackerData.json")).expect("journal on disk");
    let value: serde_json::Value = serde_json::from_str(&blob).expect("valid json");
    assert_eq!(value["2025-09-24"]["ratings"]["percentage"], 72);
    assert_eq!(value["2025-09-24"]["skills"]["skill1"], "Piano");
    assert_eq!(value["2025-09-24"]["archetype"]["sage"]["score"], 1);
}

#[test]
fn reopening_the_file_store_keeps_earlier_sections() {
    let dir = tempfile::tempdir().expect("temp dir");
    let registry = SectionRegistry::standard();
    let day = DayKey::new(journal_day());

    let discipline = registry.get_section("discipline").expect("registered");
    let first = DayRecordStore::new(FileBackend::new(dir.path(), "trackerData"));
    first
        .save(
            day,
            &discipline.id,
            score(discipline, &Answers::new().weight("todo", 1)),
        )
        .expect("discipline saved");

    let reflection = registry.get_section("reflection").expect("registered");
    let second = DayRecordStore::new(FileBackend::new(dir.path(), "trackerData"));
    second
        .save(
            day,
            &reflection.id,
            score(reflection, &Answers::new().checked("grat")),
        )
        .expect("reflection saved");

    let record = second.get_day(day);
    assert_eq!(
        record.get("discipline"),
        Some(&SectionResult::Scored(ScoreResult {
            score: 1,
            max_score: 4,
            percentage: 25,
        }))
    );
    assert_eq!(
        record.get("reflection"),
        Some(&SectionResult::Scored(ScoreResult {
            score: 1,
            max_score: 2,
            percentage: 50,
        }))
    );
}

#[test]
fn corrupted_journal_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("trackerData.json"), "{\"2025-09-24\": [").expect("write blob");

    let store = DayRecordStore::new(FileBackend::new(dir.path(), "trackerData"));

    assert!(store.load().is_empty());
    assert!(store.recorded_days().is_empty());
}

#[test]
fn custom_archetype_registry_scores_the_documented_example() {
    let registry = SectionRegistry::from_definitions(vec![SectionDefinition::subgrouped(
        "archetype",
        "Archetypes",
        vec![
            Subgroup::new("king", &["q1", "q2"]),
            Subgroup::new("warrior", &["q3", "q4"]),
        ],
        2,
    )])
    .expect("valid registry");
    let section = registry.get_section("archetype").expect("registered");

    let result = score(
        section,
        &Answers::new().weight("q1", 1).weight("q2", 1).weight("q3", 0),
    );

    let json = serde_json::to_value(&result).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({
            "king": {"score": 2, "maxScore": 2, "percentage": 100},
            "warrior": {"score": 0, "maxScore": 2, "percentage": 0}
        })
    );

    let mut record = daybook::journal::DayRecord::new();
    record.insert(section.id.clone(), result);
    let summary = project(&registry, DayKey::new(journal_day()), &record);
    assert_eq!(summary.archetypes.len(), 2);
    assert!(summary.sections.is_empty());
}
