use super::domain::{Answers, OrderedMap, ScoreResult, SectionDefinition, SubgroupName};
use super::scoring::numeric_sum;

/// Scores each sub-group of `section` on its own, keeping declared order.
///
/// Every sub-group shares the section's `max_score`.
pub fn score_subgroups(
    section: &SectionDefinition,
    answers: &Answers,
) -> OrderedMap<SubgroupName, ScoreResult> {
    section
        .subgroups
        .iter()
        .map(|subgroup| {
            let result = numeric_sum(section, &subgroup.question_ids, section.max_score, answers);
            (subgroup.name.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::domain::Subgroup;
    use crate::journal::registry::SectionRegistry;

    #[test]
    fn subgroups_are_scored_independently() {
        let section = SectionDefinition::subgrouped(
            "archetype",
            "Archetypes",
            vec![
                Subgroup::new("king", &["q1", "q2"]),
                Subgroup::new("warrior", &["q3", "q4"]),
            ],
            2,
        );
        let answers = Answers::new().weight("q1", 1).weight("q2", 1).weight("q3", 0);

        let groups = score_subgroups(&section, &answers);

        assert_eq!(
            groups.get("king"),
            Some(&ScoreResult {
                score: 2,
                max_score: 2,
                percentage: 100,
            })
        );
        assert_eq!(
            groups.get("warrior"),
            Some(&ScoreResult {
                score: 0,
                max_score: 2,
                percentage: 0,
            })
        );
    }

    #[test]
    fn results_follow_declared_subgroup_order() {
        let registry = SectionRegistry::standard();
        let archetype = registry.get_section("archetype").expect("archetype registered");

        let groups = score_subgroups(archetype, &Answers::new().checked("sage-q5"));

        let names: Vec<&str> = groups.keys().map(SubgroupName::as_str).collect();
        assert_eq!(names, vec!["king", "warrior", "sage", "scholar"]);
        assert_eq!(groups.get("sage").map(|result| result.percentage), Some(50));
    }

    #[test]
    fn serialized_subgroups_preserve_order() {
        let registry = SectionRegistry::standard();
        let archetype = registry.get_section("archetype").expect("archetype registered");

        let groups = score_subgroups(archetype, &Answers::new());
        let json = serde_json::to_string(&groups).expect("serializes");

        let king = json.find("\"king\"").expect("king present");
        let warrior = json.find("\"warrior\"").expect("warrior present");
        let scholar = json.find("\"scholar\"").expect("scholar present");
        assert!(king < warrior && warrior < scholar);
    }
}
