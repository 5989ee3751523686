//! Constructive initializer: a CSP-guided builder that produces one
//! candidate timetable from the subject list, in four phases of strictly
//! decreasing priority (projects, lab rotations, single labs, theory hours).

use crate::index::ConstraintIndex;
use crate::rng::SolverRng;
use crate::types::{
    Assignment, Candidate, FacultyId, RoomId, SectionId, SolveInput, Subject, SubjectType,
    TimetableConfig,
};
use std::collections::HashMap;

/// Builds one complete, nearly-feasible candidate. Construction is
/// single-shot; callers may discard the result and try again.
pub fn construct(input: &SolveInput, rng: &mut SolverRng) -> (Candidate, Vec<String>) {
    let mut genes: Vec<Assignment> = Vec::new();
    let mut index = ConstraintIndex::new();
    let mut warnings = Vec::new();

    // Master schedule is pre-loaded as synthetic occupancy so later phases
    // naturally avoid it through the same availability checks.
    for entry in &input.master_schedule {
        index.add(&synthetic_assignment(entry));
    }

    let sections_by_id: HashMap<&SectionId, &crate::types::Section> =
        input.sections.iter().map(|s| (&s.id, s)).collect();

    let project_subjects: Vec<&Subject> = input
        .subjects
        .iter()
        .filter(|s| s.subject_type.is_project())
        .collect();
    let lab_subjects: Vec<&Subject> = input
        .subjects
        .iter()
        .filter(|s| s.lab_hours > 0 && !s.subject_type.is_project())
        .collect();
    let theory_subjects: Vec<&Subject> = input
        .subjects
        .iter()
        .filter(|s| s.theory_hours > 0 && !s.subject_type.is_project())
        .collect();

    // Phase 1 — project blocks.
    for subject in &project_subjects {
        schedule_project(subject, &sections_by_id, &input.config, &mut genes, &mut index, rng, &mut warnings);
    }

    // Phase 2 — parallel lab rotation, grouped by section.
    let mut labs_by_section: HashMap<SectionId, Vec<&Subject>> = HashMap::new();
    for subject in &lab_subjects {
        labs_by_section
            .entry(subject.section_id())
            .or_default()
            .push(subject);
    }
    let mut rotation_handled: std::collections::HashSet<(String, String)> =
        std::collections::HashSet::new();
    let mut section_ids: Vec<SectionId> = labs_by_section.keys().cloned().collect();
    section_ids.sort_by(|a, b| a.0.cmp(&b.0));
    for section_id in &section_ids {
        let subjects = &labs_by_section[section_id];
        if subjects.len() < 2 {
            continue;
        }
        schedule_lab_rotation(
            subjects,
            section_id,
            &input.lab_rooms,
            &input.config,
            &mut genes,
            &mut index,
            rng,
            &mut warnings,
        );
        for s in subjects.iter() {
            rotation_handled.insert((s.subject_code.0.clone(), section_id.0.clone()));
        }
    }

    // Phase 3 — remaining single-lab subjects (sections with exactly one lab subject).
    for subject in &lab_subjects {
        let key = (subject.subject_code.0.clone(), subject.section_id().0.clone());
        if rotation_handled.contains(&key) {
            continue;
        }
        schedule_single_lab(
            subject,
            &input.lab_rooms,
            &input.config,
            &mut genes,
            &mut index,
            rng,
            &mut warnings,
        );
    }

    // Phase 4 — theory hours, flattened and shuffled.
    let mut theory_tasks: Vec<&Subject> = Vec::new();
    for subject in &theory_subjects {
        for _ in 0..subject.theory_hours {
            theory_tasks.push(subject);
        }
    }
    rng.shuffle(&mut theory_tasks);

    for subject in theory_tasks {
        schedule_one_theory_hour(
            subject,
            &sections_by_id,
            &input.config,
            &mut genes,
            &mut index,
            &mut warnings,
        );
    }

    let mut candidate = Candidate::new(genes);
    candidate.rebuild_index();
    (candidate, warnings)
}

fn synthetic_assignment(entry: &crate::types::MasterScheduleEntry) -> Assignment {
    Assignment {
        day: entry.day,
        period: entry.period,
        subject_code: crate::types::SubjectCode(String::new()),
        subject_name: String::new(),
        subject_type: SubjectType::CoreTheory,
        faculty_id: entry.faculty_id.clone(),
        section_id: entry.section_id.clone(),
        room_id: entry.room_id.clone(),
        batch_number: 0,
        is_theory: entry.is_theory,
    }
}

#[allow(clippy::too_many_arguments)]
fn schedule_project(
    subject: &Subject,
    sections_by_id: &HashMap<&SectionId, &crate::types::Section>,
    config: &TimetableConfig,
    genes: &mut Vec<Assignment>,
    index: &mut ConstraintIndex,
    rng: &mut SolverRng,
    warnings: &mut Vec<String>,
) {
    let section_id = subject.section_id();
    let classroom = match sections_by_id.get(&section_id) {
        Some(s) => s.classroom.clone(),
        None => {
            warnings.push(format!(
                "subject '{}' references unknown section '{}'; project skipped",
                subject.subject_code, section_id
            ));
            return;
        }
    };
    let faculty = match &subject.lab_faculty {
        Some(f) => f.clone(),
        None => {
            warnings.push(format!(
                "subject '{}' has no lab faculty assigned; project hours skipped",
                subject.subject_code
            ));
            return;
        }
    };

    let blocks_needed = subject.lab_hours / subject.lab_block_size();
    let mut scheduled_blocks = 0u32;

    let mut days: Vec<u8> = (0..config.days_per_week).collect();
    rng.shuffle(&mut days);

    for day in days {
        if scheduled_blocks >= blocks_needed {
            break;
        }
        let afternoon = config.afternoon_periods();
        let all_free = afternoon.clone().all(|period| {
            index.is_available(day, period, &faculty.0, &section_id.0, &classroom.0, true)
        });
        if all_free {
            for period in afternoon {
                let a = Assignment {
                    day,
                    period,
                    subject_code: subject.subject_code.clone(),
                    subject_name: subject.subject_name.clone(),
                    subject_type: subject.subject_type,
                    faculty_id: faculty.clone(),
                    section_id: section_id.clone(),
                    room_id: classroom.clone(),
                    batch_number: 0,
                    is_theory: true,
                };
                index.add(&a);
                genes.push(a);
            }
            scheduled_blocks += 1;
        }
    }

    if scheduled_blocks < blocks_needed {
        warnings.push(format!(
            "subject '{}' in section '{}': only scheduled {}/{} project blocks",
            subject.subject_code, section_id, scheduled_blocks, blocks_needed
        ));
    }
}

#[allow(clippy::too_many_arguments)]
fn schedule_lab_rotation(
    subjects: &[&Subject],
    section_id: &SectionId,
    lab_rooms: &[crate::types::LabRoom],
    config: &TimetableConfig,
    genes: &mut Vec<Assignment>,
    index: &mut ConstraintIndex,
    rng: &mut SolverRng,
    warnings: &mut Vec<String>,
) {
    let n = subjects.len();
    let room_ids: Vec<RoomId> = lab_rooms.iter().map(|r| r.id.clone()).collect();
    let starts = [0u8, 2, 4];

    for session_index in 0..n {
        let mut placed = false;
        let mut days: Vec<u8> = (0..config.days_per_week).collect();
        rng.shuffle(&mut days);

        'search: for day in &days {
            for &start in &starts {
                if start + 1 >= config.periods_per_day {
                    continue;
                }
                let available_rooms = index.available_lab_rooms(*day, start, 2, &room_ids);
                if available_rooms.len() < n {
                    continue;
                }
                let faculties_free = subjects.iter().all(|s| {
                    let fid = s.lab_faculty.as_ref().map(|f| f.0.as_str()).unwrap_or("");
                    (start..start + 2).all(|p| index.is_available(*day, p, fid, "", "", false))
                });
                if !faculties_free {
                    continue;
                }
                let section_free = (start..start + 2)
                    .all(|p| index.is_available(*day, p, "", &section_id.0, "", false));
                if !section_free {
                    continue;
                }

                for j in 0..n {
                    let rotated = subjects[(j + session_index) % n];
                    let faculty = match &rotated.lab_faculty {
                        Some(f) => f.clone(),
                        None => {
                            warnings.push(format!(
                                "subject '{}' has no lab faculty assigned; rotation slot skipped",
                                rotated.subject_code
                            ));
                            continue;
                        }
                    };
                    let room = available_rooms[j].clone();
                    for hour in 0..2u8 {
                        let a = Assignment {
                            day: *day,
                            period: start + hour,
                            subject_code: rotated.subject_code.clone(),
                            subject_name: rotated.subject_name.clone(),
                            subject_type: rotated.subject_type,
                            faculty_id: faculty.clone(),
                            section_id: section_id.clone(),
                            room_id: room.clone(),
                            batch_number: (j + 1) as u32,
                            is_theory: false,
                        };
                        index.add(&a);
                        genes.push(a);
                    }
                }
                placed = true;
                break 'search;
            }
        }

        if !placed {
            warnings.push(format!(
                "section '{}': could not place lab rotation session {}/{}",
                section_id,
                session_index + 1,
                n
            ));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn schedule_single_lab(
    subject: &Subject,
    lab_rooms: &[crate::types::LabRoom],
    config: &TimetableConfig,
    genes: &mut Vec<Assignment>,
    index: &mut ConstraintIndex,
    rng: &mut SolverRng,
    warnings: &mut Vec<String>,
) {
    let section_id = subject.section_id();
    let faculty = match &subject.lab_faculty {
        Some(f) => f.clone(),
        None => {
            warnings.push(format!(
                "subject '{}' has no lab faculty assigned; lab hours skipped",
                subject.subject_code
            ));
            return;
        }
    };
    let room_ids: Vec<RoomId> = lab_rooms.iter().map(|r| r.id.clone()).collect();
    let sessions_needed = subject.lab_hours / 2;
    let starts = [0u8, 2, 4];

    for _ in 0..sessions_needed {
        let mut placed = false;
        let mut days: Vec<u8> = (0..config.days_per_week).collect();
        rng.shuffle(&mut days);
        let mut shuffled_starts = starts;
        rng.shuffle(&mut shuffled_starts);

        'search: for day in &days {
            for &start in &shuffled_starts {
                if start + 1 >= config.periods_per_day {
                    continue;
                }
                let available_rooms = index.available_lab_rooms(*day, start, 2, &room_ids);
                if (available_rooms.len() as u32) < subject.no_of_batches {
                    continue;
                }
                let faculty_free =
                    (start..start + 2).all(|p| index.is_available(*day, p, &faculty.0, "", "", false));
                let section_free = (start..start + 2)
                    .all(|p| index.is_available(*day, p, "", &section_id.0, "", false));
                if !faculty_free || !section_free {
                    continue;
                }

                for batch in 0..subject.no_of_batches {
                    let room = available_rooms[batch as usize].clone();
                    for hour in 0..2u8 {
                        let a = Assignment {
                            day: *day,
                            period: start + hour,
                            subject_code: subject.subject_code.clone(),
                            subject_name: subject.subject_name.clone(),
                            subject_type: subject.subject_type,
                            faculty_id: faculty.clone(),
                            section_id: section_id.clone(),
                            room_id: room.clone(),
                            batch_number: batch + 1,
                            is_theory: false,
                        };
                        index.add(&a);
                        genes.push(a);
                    }
                }
                placed = true;
                break 'search;
            }
        }

        if !placed {
            warnings.push(format!(
                "subject '{}' in section '{}': failed to place a lab session",
                subject.subject_code, section_id
            ));
        }
    }
}

fn schedule_one_theory_hour(
    subject: &Subject,
    sections_by_id: &HashMap<&SectionId, &crate::types::Section>,
    config: &TimetableConfig,
    genes: &mut Vec<Assignment>,
    index: &mut ConstraintIndex,
    warnings: &mut Vec<String>,
) {
    let section_id = subject.section_id();
    let classroom = match sections_by_id.get(&section_id) {
        Some(s) => s.classroom.clone(),
        None => {
            warnings.push(format!(
                "subject '{}' references unknown section '{}'; theory hour skipped",
                subject.subject_code, section_id
            ));
            return;
        }
    };
    let faculty = match &subject.theory_faculty {
        Some(f) => f.clone(),
        None => {
            warnings.push(format!(
                "subject '{}' has no theory faculty assigned; theory hour skipped",
                subject.subject_code
            ));
            return;
        }
    };

    let mut best: Option<(u8, u8, i32)> = None;
    for day in 0..config.days_per_week {
        for period in config.morning_periods() {
            if !index.is_available(day, period, &faculty.0, &section_id.0, &classroom.0, true) {
                continue;
            }
            let score = slot_score(genes, day, period, &section_id, &subject.subject_code);
            if best.map(|(_, _, s)| score > s).unwrap_or(true) {
                best = Some((day, period, score));
            }
        }
    }

    if best.is_none() {
        'afternoon: for day in 0..config.days_per_week {
            for period in config.afternoon_periods() {
                if index.is_available(day, period, &faculty.0, &section_id.0, &classroom.0, true) {
                    best = Some((day, period, 0));
                    break 'afternoon;
                }
            }
        }
    }

    match best {
        Some((day, period, _)) => {
            let a = Assignment {
                day,
                period,
                subject_code: subject.subject_code.clone(),
                subject_name: subject.subject_name.clone(),
                subject_type: subject.subject_type,
                faculty_id: faculty,
                section_id,
                room_id: classroom,
                batch_number: 0,
                is_theory: true,
            };
            index.add(&a);
            genes.push(a);
        }
        None => {
            warnings.push(format!(
                "subject '{}' in section '{}': could not place a theory hour",
                subject.subject_code, section_id
            ));
        }
    }
}

/// Scores a candidate (day, period) for one theory hour of `subject_code`
/// against `section_id`'s existing placements that day. Base 100; +80 for
/// continuity with an adjacent same-section hour; else -15 per period of
/// distance to the nearest same-section hour that day; -100 for
/// anti-clustering if the subject already appears that day; +50 for period 0.
fn slot_score(
    genes: &[Assignment],
    day: u8,
    period: u8,
    section_id: &SectionId,
    subject_code: &crate::types::SubjectCode,
) -> i32 {
    let mut score = 100;

    let day_periods: Vec<u8> = genes
        .iter()
        .filter(|g| &g.section_id == section_id && g.day == day)
        .map(|g| g.period)
        .collect();

    if !day_periods.is_empty() {
        let adjacent = day_periods
            .iter()
            .any(|&p| p == period + 1 || (period > 0 && p == period - 1));
        if adjacent {
            score += 80;
        } else {
            let nearest = day_periods
                .iter()
                .map(|&p| (p as i32 - period as i32).abs())
                .min()
                .unwrap_or(0);
            score -= nearest * 15;
        }
    }

    if genes
        .iter()
        .any(|g| &g.section_id == section_id && g.day == day && &g.subject_code == subject_code)
    {
        score -= 100;
    }

    if period == 0 {
        score += 50;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faculty, LabRoom, MasterScheduleEntry, Section};

    fn section(id: &str, name: &str, semester: &str, classroom: &str) -> Section {
        Section {
            id: SectionId(id.into()),
            name: name.into(),
            semester: semester.into(),
            classroom: RoomId(classroom.into()),
        }
    }

    fn theory_subject(code: &str, hours: u32, faculty: &str, semester: &str, section: &str) -> Subject {
        Subject {
            subject_code: crate::types::SubjectCode(code.into()),
            subject_name: code.into(),
            subject_type: SubjectType::CoreTheory,
            theory_hours: hours,
            lab_hours: 0,
            theory_faculty: Some(FacultyId(faculty.into())),
            lab_faculty: None,
            no_of_batches: 1,
            section: section.into(),
            semester: semester.into(),
        }
    }

    /// Scenario A: single section, one 3-hour theory subject, no conflicts.
    #[test]
    fn single_section_sanity() {
        let input = SolveInput {
            subjects: vec![theory_subject("X", 3, "F1", "6", "A")],
            faculties: vec![Faculty {
                id: FacultyId("F1".into()),
                name: "Dr F1".into(),
            }],
            sections: vec![section("6_A", "A", "6", "R1")],
            lab_rooms: vec![],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        };
        let mut rng = SolverRng::from_seed(1);
        let (candidate, warnings) = construct(&input, &mut rng);

        assert!(warnings.is_empty());
        assert_eq!(candidate.assignments.len(), 3);
        for a in &candidate.assignments {
            assert_eq!(a.section_id.0, "6_A");
            assert_eq!(a.faculty_id.0, "F1");
            assert_eq!(a.room_id.0, "R1");
            assert!(a.is_theory);
            assert!(a.day < 6);
            assert!(a.period <= 3, "scenario A expects all periods in the morning window [0,3]");
        }
    }

    /// Scenario B: two 2-hour parallel lab subjects with two batches each
    /// rotate through two sessions, each batch meeting each lab once, with
    /// distinct rooms at every moment.
    #[test]
    fn parallel_lab_rotation_covers_every_batch_once() {
        let lab = |code: &str, faculty: &str| Subject {
            subject_code: crate::types::SubjectCode(code.into()),
            subject_name: code.into(),
            subject_type: SubjectType::CoreLab,
            theory_hours: 0,
            lab_hours: 2,
            theory_faculty: None,
            lab_faculty: Some(FacultyId(faculty.into())),
            no_of_batches: 2,
            section: "B".into(),
            semester: "4".into(),
        };
        let input = SolveInput {
            subjects: vec![lab("L1", "F1"), lab("L2", "F2")],
            faculties: vec![
                Faculty {
                    id: FacultyId("F1".into()),
                    name: "Dr F1".into(),
                },
                Faculty {
                    id: FacultyId("F2".into()),
                    name: "Dr F2".into(),
                },
            ],
            sections: vec![section("4_B", "B", "4", "R1")],
            lab_rooms: vec![
                LabRoom {
                    id: RoomId("LAB1".into()),
                    name: "Lab 1".into(),
                },
                LabRoom {
                    id: RoomId("LAB2".into()),
                    name: "Lab 2".into(),
                },
            ],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        };
        let mut rng = SolverRng::from_seed(3);
        let (candidate, warnings) = construct(&input, &mut rng);

        assert!(warnings.is_empty());
        assert_eq!(candidate.assignments.len(), 8);

        // Each (batch, subject) pair should appear exactly once across the
        // rotation's sessions.
        let mut seen_pairs: std::collections::HashSet<(u32, String)> = std::collections::HashSet::new();
        for a in &candidate.assignments {
            seen_pairs.insert((a.batch_number, a.subject_code.0.clone()));
        }
        assert_eq!(seen_pairs.len(), 4, "every batch should meet every lab exactly once");

        // At any (day, period), distinct assignments use distinct rooms.
        let mut by_slot: HashMap<(u8, u8), Vec<&Assignment>> = HashMap::new();
        for a in &candidate.assignments {
            by_slot.entry((a.day, a.period)).or_default().push(a);
        }
        for group in by_slot.values() {
            let mut rooms: Vec<&str> = group.iter().map(|a| a.room_id.0.as_str()).collect();
            rooms.sort_unstable();
            let before = rooms.len();
            rooms.dedup();
            assert_eq!(rooms.len(), before, "rooms must be distinct within a slot");
        }
    }

    /// Scenario C: one project subject with 6 lab-hours becomes two
    /// three-period afternoon blocks on different days.
    #[test]
    fn project_blocks_occupy_full_afternoon() {
        let project = Subject {
            subject_code: crate::types::SubjectCode("PR".into()),
            subject_name: "Major Project".into(),
            subject_type: SubjectType::Project,
            theory_hours: 0,
            lab_hours: 6,
            theory_faculty: None,
            lab_faculty: Some(FacultyId("F3".into())),
            no_of_batches: 1,
            section: "A".into(),
            semester: "6".into(),
        };
        let input = SolveInput {
            subjects: vec![project],
            faculties: vec![Faculty {
                id: FacultyId("F3".into()),
                name: "Dr F3".into(),
            }],
            sections: vec![section("6_A", "A", "6", "R1")],
            lab_rooms: vec![],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        };
        let mut rng = SolverRng::from_seed(5);
        let (candidate, warnings) = construct(&input, &mut rng);

        assert!(warnings.is_empty());
        assert_eq!(candidate.assignments.len(), 6);

        let mut by_day: HashMap<u8, Vec<u8>> = HashMap::new();
        for a in &candidate.assignments {
            by_day.entry(a.day).or_default().push(a.period);
        }
        assert_eq!(by_day.len(), 2, "project should land on two distinct days");
        for periods in by_day.values() {
            let mut sorted = periods.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![4, 5, 6]);
        }
    }

    /// Scenario D: a master schedule occupying every morning period for the
    /// only faculty forces the remaining theory hours into the afternoon
    /// rather than leaving them unplaced.
    #[test]
    fn forced_conflict_pushes_hours_to_afternoon() {
        let mut master_schedule = Vec::new();
        for day in 0..6u8 {
            for period in 0..4u8 {
                master_schedule.push(MasterScheduleEntry {
                    day,
                    period,
                    faculty_id: FacultyId("F1".into()),
                    section_id: SectionId("OTHER".into()),
                    room_id: RoomId("R2".into()),
                    is_theory: true,
                });
            }
        }
        let input = SolveInput {
            subjects: vec![theory_subject("X", 4, "F1", "6", "A")],
            faculties: vec![Faculty {
                id: FacultyId("F1".into()),
                name: "Dr F1".into(),
            }],
            sections: vec![section("6_A", "A", "6", "R1")],
            lab_rooms: vec![],
            master_schedule,
            config: TimetableConfig::default(),
        };
        let mut rng = SolverRng::from_seed(2);
        let (candidate, warnings) = construct(&input, &mut rng);

        assert!(warnings.is_empty());
        assert_eq!(candidate.assignments.len(), 4);
        for a in &candidate.assignments {
            assert!(a.period >= 4, "every placed hour must fall in the afternoon");
        }
    }

    #[test]
    fn unknown_section_is_skipped_with_warning() {
        let input = SolveInput {
            subjects: vec![theory_subject("X", 2, "F1", "9", "Z")],
            faculties: vec![Faculty {
                id: FacultyId("F1".into()),
                name: "Dr F1".into(),
            }],
            sections: vec![section("6_A", "A", "6", "R1")],
            lab_rooms: vec![],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        };
        let mut rng = SolverRng::from_seed(11);
        let (candidate, warnings) = construct(&input, &mut rng);

        assert!(candidate.assignments.is_empty());
        assert_eq!(warnings.len(), 2);
    }
}
