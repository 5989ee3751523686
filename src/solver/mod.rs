//! The timetable solver: constructive initialization, a genetic algorithm,
//! tabu-augmented local search, and a lab-continuity repair pass, wired
//! together by a thin driver.

mod evolution;
pub mod fitness;
mod initializer;
mod repair;
mod tabu;

use crate::rng::SolverRng;
use crate::types::{Assignment, SolveInput};
use tracing::{info, warn};

/// Every tunable knob of the solve, with the §4.3/§4.5 defaults.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub population_size: usize,
    pub generations: u32,
    pub crossover_rate: f64,
    pub mutation_rate_start: f64,
    pub mutation_rate_end: f64,
    pub elite_ratio: f64,
    pub tournament_k: usize,
    pub diversity_stagnation_threshold: u32,
    pub diversity_injection_fraction: f64,
    pub elite_local_search_count: usize,
    pub early_stop_fitness: f64,
    pub tabu_size: usize,
    /// Tabu iterations for the intra-generation elite pass (§4.3 step 5).
    pub elite_tabu_iterations: u32,
    /// Tabu iterations for the driver's final pass (§4.7 step 5).
    pub final_tabu_iterations: u32,
    /// Minimum fitness to report `success = true`; distinct from
    /// `early_stop_fitness`, which only governs when the GA loop stops.
    pub success_threshold: f64,
    /// Fixed seed for reproducible solves (Scenario F). `None` draws from
    /// OS entropy.
    pub seed: Option<u64>,
    /// Optional wall-clock deadline (§5: "Implementations MAY add a
    /// wall-clock deadline by checking it at each generation boundary").
    /// Checked once per generation; `None` runs the full `generations` budget.
    pub max_wall_clock_seconds: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 120,
            generations: 500,
            crossover_rate: 0.85,
            mutation_rate_start: 0.25,
            mutation_rate_end: 0.05,
            elite_ratio: 0.15,
            tournament_k: 3,
            diversity_stagnation_threshold: 50,
            diversity_injection_fraction: 0.25,
            elite_local_search_count: 5,
            early_stop_fitness: 1000.0,
            tabu_size: 20,
            elite_tabu_iterations: 30,
            final_tabu_iterations: 50,
            success_threshold: 900.0,
            seed: None,
            max_wall_clock_seconds: None,
        }
    }
}

/// The wire-level result shape (§6): the best timetable found, its
/// fitness, whether it cleared the success threshold, and any warnings
/// accumulated along the way.
#[derive(Debug, Clone)]
pub struct TimetableResult {
    pub timetable: Vec<Assignment>,
    pub fitness: f64,
    pub success: bool,
    pub warnings: Vec<String>,
    /// RFC 3339 timestamp of when this result was produced, matching the
    /// teacher's own `generated_at` field on its result type.
    pub generated_at: String,
}

/// Runs one full solve: normalize, evolve, repair, and (if still weak) a
/// final tabu pass. Never fails on algorithmic grounds — infeasibility
/// always surfaces as a warning plus a lower fitness, never an error.
pub fn generate(mut input: SolveInput, config: &SolverConfig) -> TimetableResult {
    let mut warnings = Vec::new();

    let subjects = std::mem::take(&mut input.subjects);
    input.subjects = subjects
        .into_iter()
        .map(|subject| {
            let (normalized, warning) = subject.normalize();
            if let Some(w) = warning {
                warn!("{w}");
                warnings.push(w);
            }
            normalized
        })
        .collect();

    let mut rng = match config.seed {
        Some(seed) => SolverRng::from_seed(seed),
        None => SolverRng::from_entropy(),
    };

    info!(
        population_size = config.population_size,
        generations = config.generations,
        subjects = input.subjects.len(),
        "starting solve"
    );

    let (mut best, evolution_warnings) = evolution::run(&input, config, &mut rng);
    warnings.extend(evolution_warnings);

    if repair::repair(&mut best, &input.config) {
        let report = fitness::evaluate(&best);
        best.fitness = report.fitness;
        info!(fitness = best.fitness, "lab-continuity repair applied");
    }

    if best.fitness < 900.0 {
        best = tabu::search(&best, config.final_tabu_iterations, config.tabu_size, &mut rng);
        let report = fitness::evaluate(&best);
        best.fitness = report.fitness;
    }

    let report = fitness::evaluate(&best);
    best.fitness = report.fitness;
    let success = report.hard_violation_count() == 0 && best.fitness >= config.success_threshold;

    if !success {
        let top = report.top_categories(3);
        if top.is_empty() {
            warnings.push(format!(
                "solve did not reach the success threshold (fitness {:.1} < {:.1})",
                best.fitness, config.success_threshold
            ));
        } else {
            warnings.push(format!(
                "solve did not reach the success threshold (fitness {:.1}); top violations: {}",
                best.fitness,
                top.join(", ")
            ));
        }
    }

    info!(
        fitness = best.fitness,
        success,
        quality = report.quality_tier(),
        "solve complete"
    );

    TimetableResult {
        timetable: best.assignments,
        fitness: best.fitness,
        success,
        warnings,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Retries `generate` up to `max_attempts` times, keeping the best-fitness
/// result seen. Never blocks forever: the best candidate found is always
/// returned, `success` reflects whether `fitness_threshold` was ever met.
pub fn generate_with_retry(
    input: SolveInput,
    config: &SolverConfig,
    max_attempts: u32,
    fitness_threshold: f64,
) -> TimetableResult {
    let attempts = max_attempts.max(1);
    let mut best: Option<TimetableResult> = None;

    for attempt in 1..=attempts {
        let result = generate(input.clone(), config);
        let reached = result.fitness >= fitness_threshold;
        let is_better = best.as_ref().map(|b| result.fitness > b.fitness).unwrap_or(true);

        info!(attempt, fitness = result.fitness, reached, "retry attempt complete");

        if is_better {
            best = Some(result);
        }
        if reached {
            break;
        }
    }

    let mut result = best.expect("attempts is clamped to at least 1");
    result.success = result.fitness >= fitness_threshold;
    if !result.success {
        result.warnings.push(format!(
            "exhausted {attempts} attempt(s); best fitness {:.1} remained below threshold {:.1}",
            result.fitness, fitness_threshold
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faculty, LabRoom, Section, Subject, SubjectCode, SubjectType, TimetableConfig};

    fn single_section_input() -> SolveInput {
        SolveInput {
            subjects: vec![Subject {
                subject_code: SubjectCode("X".into()),
                subject_name: "X".into(),
                subject_type: SubjectType::CoreTheory,
                theory_hours: 3,
                lab_hours: 0,
                theory_faculty: Some(crate::types::FacultyId("F1".into())),
                lab_faculty: None,
                no_of_batches: 1,
                section: "A".into(),
                semester: "6".into(),
            }],
            faculties: vec![Faculty {
                id: crate::types::FacultyId("F1".into()),
                name: "Dr F1".into(),
            }],
            sections: vec![Section {
                id: crate::types::SectionId("6_A".into()),
                name: "A".into(),
                semester: "6".into(),
                classroom: crate::types::RoomId("R1".into()),
            }],
            lab_rooms: vec![LabRoom {
                id: crate::types::RoomId("LAB1".into()),
                name: "Lab 1".into(),
            }],
            master_schedule: vec![],
            config: TimetableConfig::default(),
        }
    }

    #[test]
    fn empty_subject_list_is_trivially_perfect() {
        let mut input = single_section_input();
        input.subjects.clear();
        let config = SolverConfig {
            population_size: 4,
            generations: 2,
            ..SolverConfig::default()
        };
        let result = generate(input, &config);
        assert!(result.timetable.is_empty());
        assert_eq!(result.fitness, 1000.0);
        assert!(result.success);
    }

    #[test]
    fn single_section_sanity() {
        let input = single_section_input();
        let config = SolverConfig {
            population_size: 20,
            generations: 30,
            seed: Some(7),
            ..SolverConfig::default()
        };
        let result = generate(input, &config);
        assert_eq!(result.timetable.len(), 3);
        assert!(result.timetable.iter().all(|a| a.is_theory));
        assert!(result.fitness >= 900.0);
    }

    #[test]
    fn reproducible_with_fixed_seed() {
        let config = SolverConfig {
            population_size: 12,
            generations: 10,
            seed: Some(99),
            ..SolverConfig::default()
        };
        let a = generate(single_section_input(), &config);
        let b = generate(single_section_input(), &config);
        assert_eq!(a.fitness, b.fitness);
        assert_eq!(a.timetable.len(), b.timetable.len());
    }
}
