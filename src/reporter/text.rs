use crate::solver::TimetableResult;

/// Plain-text rendering, one line per assignment, sorted for stable diffs.
pub fn generate_text_report(result: &TimetableResult) -> String {
    let mut lines = vec![
        format!("Fitness: {:.1}/1000", result.fitness),
        format!("Success: {}", result.success),
        format!("Assignments: {}", result.timetable.len()),
        String::new(),
    ];

    let mut sorted: Vec<_> = result.timetable.iter().collect();
    sorted.sort_by_key(|a| (a.section_id.0.clone(), a.day, a.period, a.batch_number));

    for a in sorted {
        lines.push(format!(
            "{} D{}P{} {} section={} faculty={} room={} batch={}",
            a.subject_code,
            a.day + 1,
            a.period + 1,
            if a.is_theory { "theory" } else { "lab" },
            a.section_id,
            a.faculty_id,
            a.room_id,
            a.batch_number,
        ));
    }

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        for warning in &result.warnings {
            lines.push(format!("- {warning}"));
        }
    }

    lines.join("\n")
}
