use daybook::journal::{DailySummary, ScoringMode, SectionRegistry};

const BAR_WIDTH: usize = 20;

pub(crate) fn render_summary(summary: &DailySummary) {
    println!("Daily summary for {}", summary.day);

    if summary.is_empty() {
        println!("\nNothing recorded yet.");
    }

    if !summary.sections.is_empty() {
        println!("\nSection scores");
        for entry in &summary.sections {
            println!(
                "- {:<18} {} {}/{} ({}%)",
                entry.label,
                percentage_bar(entry.percentage),
                entry.score,
                entry.max_score,
                entry.percentage
            );
        }
    }

    if !summary.skills.is_empty() {
        println!("\nSkills practiced");
        for skill in &summary.skills {
            println!("- {skill}");
        }
    }

    if !summary.archetypes.is_empty() {
        println!("\nArchetype performance");
        for entry in &summary.archetypes {
            println!(
                "- {:<18} {} {}/{}",
                entry.label,
                percentage_bar(entry.percentage),
                entry.score,
                entry.max_score
            );
        }
    }

    if !summary.pending_sections.is_empty() {
        let pending: Vec<&str> = summary
            .pending_sections
            .iter()
            .map(|section| section.as_str())
            .collect();
        println!("\nNot yet recorded: {}", pending.join(", "));
    }
}

pub(crate) fn render_sections(registry: &SectionRegistry) {
    println!("Registered sections");
    for section in registry.sections() {
        match section.mode {
            ScoringMode::SubGrouped => {
                println!(
                    "- {} ({}, {}, max {} per group)",
                    section.id,
                    section.label,
                    section.mode.label(),
                    section.max_score
                );
                for subgroup in &section.subgroups {
                    let questions: Vec<&str> =
                        subgroup.question_ids.iter().map(|q| q.as_str()).collect();
                    println!("    {}: {}", subgroup.name, questions.join(", "));
                }
            }
            ScoringMode::SingleSelect => {
                let questions: Vec<&str> =
                    section.question_ids.iter().map(|q| q.as_str()).collect();
                println!(
                    "- {} ({}, {}): {}",
                    section.id,
                    section.label,
                    section.mode.label(),
                    questions.join(", ")
                );
            }
            ScoringMode::NumericSum | ScoringMode::StarRating => {
                let questions: Vec<&str> =
                    section.question_ids.iter().map(|q| q.as_str()).collect();
                println!(
                    "- {} ({}, {}, max {}): {}",
                    section.id,
                    section.label,
                    section.mode.label(),
                    section.max_score,
                    questions.join(", ")
                );
            }
        }
    }
}

fn percentage_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
