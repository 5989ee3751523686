//! Fitness evaluator: a pure function over a candidate that sums weighted
//! hard-constraint violations and soft-preference penalties into a single
//! score, starting at 1000.

use crate::types::{default_afternoon, Assignment, Candidate, SubjectCode};
use std::collections::HashMap;

/// One named violation category and its contribution to the score.
#[derive(Debug, Clone)]
pub struct ViolationEntry {
    pub name: &'static str,
    pub count: u32,
    pub weight: f64,
    pub is_hard: bool,
}

impl ViolationEntry {
    pub fn penalty(&self) -> f64 {
        self.count as f64 * self.weight
    }
}

/// Full breakdown of a candidate's fitness.
#[derive(Debug, Clone)]
pub struct FitnessReport {
    pub fitness: f64,
    pub violations: Vec<ViolationEntry>,
}

impl FitnessReport {
    pub fn hard_violation_count(&self) -> u32 {
        self.violations
            .iter()
            .filter(|v| v.is_hard)
            .map(|v| v.count)
            .sum()
    }

    pub fn quality_tier(&self) -> &'static str {
        let hard = self.hard_violation_count();
        if hard > 0 {
            "unacceptable"
        } else if self.fitness >= 950.0 {
            "excellent"
        } else if self.fitness >= 850.0 {
            "very good"
        } else if self.fitness >= 700.0 {
            "good"
        } else {
            "acceptable"
        }
    }

    pub fn top_categories(&self, n: usize) -> Vec<String> {
        let mut sorted: Vec<&ViolationEntry> =
            self.violations.iter().filter(|v| v.count > 0).collect();
        sorted.sort_by(|a, b| b.penalty().partial_cmp(&a.penalty()).unwrap());
        sorted
            .into_iter()
            .take(n)
            .map(|v| format!("{} (x{})", v.name, v.count))
            .collect()
    }
}

/// The single weight used for theory-in-afternoon, unifying the three
/// inconsistent figures the source carried (see Open Question 1 /
/// `DESIGN.md`): 100 per affected assignment, counted once by the fitness
/// function only — the initializer's own -200 scoring-pass penalty in
/// Phase 4 is a separate, local search heuristic and is not re-applied here.
const AFTERNOON_THEORY_WEIGHT: f64 = 100.0;

/// Evaluates a candidate's fitness, returning both the score and a
/// per-category breakdown so callers (driver, reporter) can explain it.
pub fn evaluate(candidate: &Candidate) -> FitnessReport {
    let assignments = &candidate.assignments;

    let violations = vec![
        count_double_booking(assignments, "FacultyDoubleBooking", 500.0, |a| {
            Some((a.faculty_id.0.clone(), a.day, a.period))
        }),
        // Parallel labs legitimately share a section slot across distinct
        // batches, so section conflicts need the exception-aware counter
        // rather than the plain double_booking key.
        count_section_conflicts(assignments),
        count_double_booking(assignments, "ClassroomDoubleBooking", 400.0, |a| {
            a.is_theory.then(|| (a.room_id.0.clone(), a.day, a.period))
        }),
        count_double_booking(assignments, "LabRoomDoubleBooking", 400.0, |a| {
            (!a.is_theory).then(|| (a.room_id.0.clone(), a.day, a.period))
        }),
        count_duplicate_assignments(assignments),
        count_lab_continuity(assignments),
        count_project_continuity(assignments),
        count_afternoon_theory(assignments),
        count_gaps(assignments),
        count_same_subject_per_day(assignments),
        count_sparse_days(assignments),
    ];

    let total_penalty: f64 = violations.iter().map(|v| v.penalty()).sum();
    let fitness = (1000.0 - total_penalty).max(0.0);

    FitnessReport { fitness, violations }
}

fn count_double_booking(
    assignments: &[Assignment],
    name: &'static str,
    weight: f64,
    key_of: impl Fn(&Assignment) -> Option<(String, u8, u8)>,
) -> ViolationEntry {
    let mut counts: HashMap<(String, u8, u8), u32> = HashMap::new();
    for a in assignments {
        if let Some(key) = key_of(a) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    let violations = counts.values().filter(|&&c| c > 1).map(|c| c - 1).sum();
    ViolationEntry {
        name,
        count: violations,
        weight,
        is_hard: true,
    }
}

/// Section double-booking, honoring the documented exception: several
/// assignments at one (section, day, period) are fine iff all are
/// non-theory with pairwise-distinct batch numbers.
fn count_section_conflicts(assignments: &[Assignment]) -> ViolationEntry {
    let mut by_slot: HashMap<(String, u8, u8), Vec<&Assignment>> = HashMap::new();
    for a in assignments {
        by_slot
            .entry((a.section_id.0.clone(), a.day, a.period))
            .or_default()
            .push(a);
    }
    let mut violations = 0u32;
    for group in by_slot.values() {
        if group.len() <= 1 {
            continue;
        }
        let all_parallel_labs = group.iter().all(|a| !a.is_theory)
            && {
                let mut batches: Vec<u32> = group.iter().map(|a| a.batch_number).collect();
                batches.sort_unstable();
                batches.dedup();
                batches.len() == group.len()
            };
        if !all_parallel_labs {
            violations += group.len() as u32 - 1;
        }
    }
    ViolationEntry {
        name: "SectionDoubleBooking",
        count: violations,
        weight: 500.0,
        is_hard: true,
    }
}

/// Open Question 2: crossover can emit exact duplicate assignments. Counted
/// as its own hard violation instead of only surfacing indirectly through
/// resource collisions.
fn count_duplicate_assignments(assignments: &[Assignment]) -> ViolationEntry {
    let mut counts: HashMap<(SubjectCode, String, u32, u8, u8), u32> = HashMap::new();
    for a in assignments {
        let key = (
            a.subject_code.clone(),
            a.section_id.0.clone(),
            a.batch_number,
            a.day,
            a.period,
        );
        *counts.entry(key).or_insert(0) += 1;
    }
    let violations = counts.values().filter(|&&c| c > 1).map(|c| c - 1).sum();
    ViolationEntry {
        name: "DuplicateAssignment",
        count: violations,
        weight: 500.0,
        is_hard: true,
    }
}

fn count_lab_continuity(assignments: &[Assignment]) -> ViolationEntry {
    let mut sessions: HashMap<(SubjectCode, String, u32, u8), Vec<u8>> = HashMap::new();
    for a in assignments.iter().filter(|a| !a.is_theory) {
        sessions
            .entry((
                a.subject_code.clone(),
                a.section_id.0.clone(),
                a.batch_number,
                a.day,
            ))
            .or_default()
            .push(a.period);
    }
    let mut violations = 0u32;
    for periods in sessions.values() {
        if periods.len() <= 1 {
            continue;
        }
        let min = *periods.iter().min().unwrap();
        let max = *periods.iter().max().unwrap();
        if (max - min + 1) as usize != periods.len() {
            violations += 1;
        }
    }
    ViolationEntry {
        name: "NonContiguousLab",
        count: violations,
        weight: 200.0,
        is_hard: true,
    }
}

fn count_project_continuity(assignments: &[Assignment]) -> ViolationEntry {
    let afternoon = default_afternoon();
    let mut groups: HashMap<(SubjectCode, String, u8), Vec<u8>> = HashMap::new();
    for a in assignments
        .iter()
        .filter(|a| a.subject_type.is_project())
    {
        groups
            .entry((a.subject_code.clone(), a.section_id.0.clone(), a.day))
            .or_default()
            .push(a.period);
    }
    let mut violations = 0u32;
    for periods in groups.values() {
        let mut sorted = periods.clone();
        sorted.sort_unstable();
        let expected: Vec<u8> = afternoon.clone().collect();
        if sorted != expected {
            violations += 1;
        }
    }
    ViolationEntry {
        name: "ProjectNotFullAfternoon",
        count: violations,
        weight: 300.0,
        is_hard: true,
    }
}

fn count_afternoon_theory(assignments: &[Assignment]) -> ViolationEntry {
    let afternoon = default_afternoon();
    let count = assignments
        .iter()
        .filter(|a| a.is_theory && !a.subject_type.is_project() && afternoon.contains(&a.period))
        .count() as u32;
    ViolationEntry {
        name: "TheoryInAfternoon",
        count,
        weight: AFTERNOON_THEORY_WEIGHT,
        is_hard: false,
    }
}

fn count_gaps(assignments: &[Assignment]) -> ViolationEntry {
    let mut by_section_day: HashMap<(String, u8), Vec<u8>> = HashMap::new();
    for a in assignments {
        by_section_day
            .entry((a.section_id.0.clone(), a.day))
            .or_default()
            .push(a.period);
    }
    let mut total = 0u32;
    for periods in by_section_day.values() {
        if periods.is_empty() {
            continue;
        }
        let min = *periods.iter().min().unwrap();
        let max = *periods.iter().max().unwrap();
        let span = (max - min + 1) as u32;
        // Parallel-lab batches (and crossover-induced duplicates) can put
        // several assignments on the same period, so count distinct
        // occupied periods rather than raw assignment count.
        let occupied = periods.iter().collect::<std::collections::HashSet<_>>().len() as u32;
        total += span.saturating_sub(occupied) * 2;
    }
    ViolationEntry {
        name: "ScheduleGaps",
        count: total,
        weight: 100.0,
        is_hard: false,
    }
}

fn count_same_subject_per_day(assignments: &[Assignment]) -> ViolationEntry {
    let mut counts: HashMap<(SubjectCode, String, u8), u32> = HashMap::new();
    for a in assignments {
        *counts
            .entry((a.subject_code.clone(), a.section_id.0.clone(), a.day))
            .or_insert(0) += 1;
    }
    let violations = counts.values().map(|&c| c.saturating_sub(2)).sum();
    ViolationEntry {
        name: "SameSubjectRepeated",
        count: violations,
        weight: 50.0,
        is_hard: false,
    }
}

fn count_sparse_days(assignments: &[Assignment]) -> ViolationEntry {
    let mut counts: HashMap<(String, u8), u32> = HashMap::new();
    for a in assignments {
        *counts.entry((a.section_id.0.clone(), a.day)).or_insert(0) += 1;
    }
    let violations = counts
        .values()
        .filter(|&&c| c == 1 || c == 2)
        .map(|&c| 3 - c)
        .sum();
    ViolationEntry {
        name: "SparseDay",
        count: violations,
        weight: 30.0,
        is_hard: false,
    }
}
