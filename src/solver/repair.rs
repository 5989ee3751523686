//! Lab-continuity repair: a single, targeted post-evolution pass that
//! relocates two-hour lab sessions whose periods ended up non-adjacent,
//! the one violation class crossover and mutation struggle to self-heal.

use crate::types::{Candidate, SectionId, SubjectCode, TimetableConfig};
use std::collections::HashMap;

const LAB_STARTS: [u8; 3] = [0, 2, 4];

/// Attempts to mend every non-contiguous two-period lab group in place.
/// Returns whether anything was changed, so the caller knows to recompute
/// fitness; the candidate's index is left rebuilt either way.
pub fn repair(candidate: &mut Candidate, config: &TimetableConfig) -> bool {
    let mut groups: HashMap<(SubjectCode, SectionId, u32, u8), Vec<usize>> = HashMap::new();
    for (i, a) in candidate.assignments.iter().enumerate() {
        if a.is_theory {
            continue;
        }
        groups
            .entry((
                a.subject_code.clone(),
                a.section_id.clone(),
                a.batch_number,
                a.day,
            ))
            .or_default()
            .push(i);
    }

    let mut changed = false;

    for indices in groups.into_values() {
        if indices.len() != 2 {
            continue;
        }
        let (i, j) = (indices[0], indices[1]);
        let p0 = candidate.assignments[i].period;
        let p1 = candidate.assignments[j].period;
        if (p0 as i32 - p1 as i32).abs() == 1 {
            continue;
        }

        let faculty = candidate.assignments[i].faculty_id.clone();
        let section = candidate.assignments[i].section_id.clone();
        let room = candidate.assignments[i].room_id.clone();
        let original_day = candidate.assignments[i].day;

        candidate.index.remove(&candidate.assignments[i].clone());
        candidate.index.remove(&candidate.assignments[j].clone());

        let mut placed = false;
        let mut days_to_try = vec![original_day];
        days_to_try.extend((0..config.days_per_week).filter(|&d| d != original_day));

        'search: for day in days_to_try {
            for &start in &LAB_STARTS {
                if start + 1 >= config.periods_per_day {
                    continue;
                }
                let both_free = (start..=start + 1).all(|period| {
                    candidate
                        .index
                        .is_available(day, period, &faculty.0, &section.0, &room.0, false)
                });
                if both_free {
                    candidate.assignments[i].day = day;
                    candidate.assignments[i].period = start;
                    candidate.assignments[j].day = day;
                    candidate.assignments[j].period = start + 1;
                    placed = true;
                    changed = true;
                    break 'search;
                }
            }
        }

        candidate.index.add(&candidate.assignments[i].clone());
        candidate.index.add(&candidate.assignments[j].clone());

        if !placed {
            // No slot anywhere; leave the broken pair as-is, already re-added.
            continue;
        }
    }

    if changed {
        candidate.rebuild_index();
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignment, FacultyId, RoomId, SubjectType};

    fn lab(day: u8, period: u8) -> Assignment {
        Assignment {
            day,
            period,
            subject_code: SubjectCode("L1".into()),
            subject_name: "L1".into(),
            subject_type: SubjectType::CoreLab,
            faculty_id: FacultyId("F1".into()),
            section_id: SectionId("4_B".into()),
            room_id: RoomId("LAB1".into()),
            batch_number: 1,
            is_theory: false,
        }
    }

    #[test]
    fn relocates_non_contiguous_pair_to_free_slot() {
        let mut c = Candidate::new(vec![lab(0, 0), lab(0, 3)]);
        let config = TimetableConfig::default();
        let changed = repair(&mut c, &config);
        assert!(changed);
        let mut periods: Vec<u8> = c.assignments.iter().map(|a| a.period).collect();
        periods.sort_unstable();
        assert_eq!(periods[1] - periods[0], 1);
        assert!(c.assignments.iter().all(|a| a.day == c.assignments[0].day));
    }

    #[test]
    fn leaves_already_contiguous_pair_untouched() {
        let mut c = Candidate::new(vec![lab(0, 4), lab(0, 5)]);
        let config = TimetableConfig::default();
        let changed = repair(&mut c, &config);
        assert!(!changed);
    }
}
