use crate::solver::TimetableResult;
use crate::types::SectionId;
use std::collections::{BTreeMap, HashSet};

/// Renders the timetable as one Markdown table per section, grouped by day.
pub fn generate_markdown_report(result: &TimetableResult) -> String {
    let mut lines = vec![
        "# Timetable".to_string(),
        String::new(),
        format!(
            "Fitness: **{:.1}**/1000 — {}",
            result.fitness,
            if result.success { "success" } else { "needs review" }
        ),
        String::new(),
    ];

    let sections: HashSet<&SectionId> = result.timetable.iter().map(|a| &a.section_id).collect();
    let mut section_ids: Vec<&SectionId> = sections.into_iter().collect();
    section_ids.sort_by(|a, b| a.0.cmp(&b.0));

    for section_id in section_ids {
        lines.push(format!("## Section {section_id}"));
        lines.push(String::new());

        let mut by_day: BTreeMap<u8, Vec<_>> = BTreeMap::new();
        for a in result.timetable.iter().filter(|a| &a.section_id == section_id) {
            by_day.entry(a.day).or_default().push(a);
        }

        for (day, mut entries) in by_day {
            entries.sort_by_key(|a| (a.period, a.batch_number));
            lines.push(format!("**{}**", crate::types::Period::new(day, 0).day_name()));
            for a in entries {
                let batch = if a.batch_number > 0 {
                    format!(" (batch {})", a.batch_number)
                } else {
                    String::new()
                };
                lines.push(format!(
                    "- Period {}: {} — {}{} [{}]",
                    a.period + 1,
                    a.subject_name,
                    a.faculty_id,
                    batch,
                    a.room_id
                ));
            }
            lines.push(String::new());
        }
    }

    if !result.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        lines.push(String::new());
        for warning in &result.warnings {
            lines.push(format!("- {warning}"));
        }
    }

    lines.join("\n")
}
