use crate::error::Result;
use crate::types::{FacultyId, SectionId, SolveInput};
use std::collections::HashSet;

/// Validation result with collected errors and warnings, mirroring the
/// driver's own warnings list so callers can inspect input problems before
/// a solve even begins.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Structural validation of a `SolveInput`: duplicate ids, dangling section
/// references, and subjects with no path to a qualified faculty. This is
/// the `InputMalformed` boundary from §7 — callers should refuse to solve
/// on a non-empty error list rather than handing it to the driver.
pub fn validate_input(input: &SolveInput) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    let section_ids: HashSet<&SectionId> = input.sections.iter().map(|s| &s.id).collect();
    let faculty_ids: HashSet<&FacultyId> = input.faculties.iter().map(|f| &f.id).collect();

    check_duplicate_section_ids(input, &mut result);
    check_duplicate_faculty_ids(input, &mut result);
    check_duplicate_lab_room_ids(input, &mut result);

    for subject in &input.subjects {
        let section_id = subject.section_id();
        if !section_ids.contains(&section_id) {
            result.add_error(format!(
                "Subject '{}' references unknown section '{}'",
                subject.subject_code, section_id
            ));
        }

        if let Some(faculty) = &subject.theory_faculty {
            if !faculty_ids.contains(faculty) {
                result.add_warning(format!(
                    "Subject '{}' lists unknown theory faculty '{}'",
                    subject.subject_code, faculty
                ));
            }
        }
        if let Some(faculty) = &subject.lab_faculty {
            if !faculty_ids.contains(faculty) {
                result.add_warning(format!(
                    "Subject '{}' lists unknown lab faculty '{}'",
                    subject.subject_code, faculty
                ));
            }
        }

        if subject.theory_hours > 0 && subject.theory_faculty.is_none() {
            result.add_warning(format!(
                "Subject '{}' has theory hours but no theory faculty; hours will be skipped",
                subject.subject_code
            ));
        }
        if subject.lab_hours > 0 && subject.lab_faculty.is_none() {
            result.add_warning(format!(
                "Subject '{}' has lab hours but no lab faculty; hours will be skipped",
                subject.subject_code
            ));
        }

        if subject.lab_hours > 0 && input.lab_rooms.is_empty() {
            result.add_warning(format!(
                "Subject '{}' needs lab hours but no lab rooms are configured",
                subject.subject_code
            ));
        }
    }

    for entry in &input.master_schedule {
        if entry.day >= input.config.days_per_week || entry.period >= input.config.periods_per_day {
            result.add_error(format!(
                "master_schedule entry for '{}' at day {} period {} falls outside the configured grid",
                entry.section_id, entry.day, entry.period
            ));
        }
    }

    if !result.is_valid() {
        return Err(anyhow::anyhow!(
            "Input validation failed with {} error(s):\n{}",
            result.errors.len(),
            result.errors.join("\n")
        ));
    }

    Ok(result)
}

fn check_duplicate_section_ids(input: &SolveInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for section in &input.sections {
        if !seen.insert(&section.id) {
            result.add_error(format!("Duplicate section id: '{}'", section.id));
        }
    }
}

fn check_duplicate_faculty_ids(input: &SolveInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for faculty in &input.faculties {
        if !seen.insert(&faculty.id) {
            result.add_error(format!("Duplicate faculty id: '{}'", faculty.id));
        }
    }
}

fn check_duplicate_lab_room_ids(input: &SolveInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for room in &input.lab_rooms {
        if !seen.insert(&room.id) {
            result.add_error(format!("Duplicate lab room id: '{}'", room.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faculty, RoomId, Section, Subject, SubjectCode, SubjectType, TimetableConfig};

    fn base_input() -> SolveInput {
        SolveInput {
            subjects: vec![],
            faculties: vec![Faculty {
                id: FacultyId("F1".into()),
                name: "Dr F1".into(),
            }],
            sections: vec![Section {
                id: SectionId("6_A".into()),
                name: "A".into(),
                semester: "6".into(),
                classroom: RoomId("R1".into()),
            }],
            lab_rooms: vec![],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        }
    }

    #[test]
    fn valid_input_passes() {
        let mut input = base_input();
        input.subjects.push(Subject {
            subject_code: SubjectCode("X".into()),
            subject_name: "X".into(),
            subject_type: SubjectType::CoreTheory,
            theory_hours: 3,
            lab_hours: 0,
            theory_faculty: Some(FacultyId("F1".into())),
            lab_faculty: None,
            no_of_batches: 1,
            section: "A".into(),
            semester: "6".into(),
        });
        let result = validate_input(&input).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn unknown_section_is_an_error() {
        let mut input = base_input();
        input.subjects.push(Subject {
            subject_code: SubjectCode("Y".into()),
            subject_name: "Y".into(),
            subject_type: SubjectType::CoreTheory,
            theory_hours: 2,
            lab_hours: 0,
            theory_faculty: Some(FacultyId("F1".into())),
            lab_faculty: None,
            no_of_batches: 1,
            section: "Z".into(),
            semester: "6".into(),
        });
        let result = validate_input(&input);
        assert!(result.is_err());
    }
}
