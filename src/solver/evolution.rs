//! The genetic algorithm population loop: tournament selection, one-point
//! crossover, swap mutation, elitism, and diversity injection on stagnation.

use crate::rng::SolverRng;
use crate::solver::{fitness, initializer, tabu, SolverConfig};
use crate::types::{Candidate, SolveInput};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs the full evolution loop and returns the best candidate found plus
/// any warnings accumulated during initial population construction.
pub fn run(input: &SolveInput, config: &SolverConfig, rng: &mut SolverRng) -> (Candidate, Vec<String>) {
    let (mut population, mut warnings) = initial_population(input, config, rng);
    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());

    let mut best_ever = population[0].clone();
    let mut stagnation = 0u32;
    let started_at = Instant::now();
    let deadline = config.max_wall_clock_seconds.map(Duration::from_secs);

    let elite_count = ((config.elite_ratio * config.population_size as f64).round() as usize)
        .clamp(1, config.population_size);
    let local_search_count = config.elite_local_search_count.min(elite_count);
    let diversity_count =
        ((config.diversity_injection_fraction * config.population_size as f64).round() as usize)
            .min(config.population_size);

    for generation in 0..config.generations {
        if let Some(deadline) = deadline {
            if started_at.elapsed() >= deadline {
                warn!(generation, "wall-clock deadline reached; returning best_ever early");
                warnings.push(format!(
                    "solve stopped early at generation {generation} after exceeding the {}s wall-clock deadline",
                    deadline.as_secs()
                ));
                break;
            }
        }

        population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());

        if population[0].fitness > best_ever.fitness {
            best_ever = population[0].clone();
            stagnation = 0;
        } else {
            stagnation += 1;
        }

        if stagnation > config.diversity_stagnation_threshold && diversity_count > 0 {
            debug!(generation, "stagnation threshold exceeded; injecting diversity");
            let cut = population.len().saturating_sub(diversity_count);
            let mut fresh_rngs: Vec<SolverRng> = (0..diversity_count)
                .map(|i| rng.fork(generation as u64 * 1000 + i as u64))
                .collect();
            let fresh: Vec<Candidate> = fresh_rngs
                .par_iter_mut()
                .map(|r| {
                    let (c, w) = initializer::construct(input, r);
                    (c, w)
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|(mut c, w)| {
                    let report = fitness::evaluate(&c);
                    c.fitness = report.fitness;
                    warnings.extend(w);
                    c
                })
                .collect();
            population.truncate(cut);
            population.extend(fresh);
            stagnation = 0;
        }

        let mutation_rate = interpolate(
            config.mutation_rate_start,
            config.mutation_rate_end,
            generation,
            config.generations,
        );

        let mut next: Vec<Candidate> = population.iter().take(elite_count).cloned().collect();

        for elite in next.iter_mut().take(local_search_count) {
            let improved = tabu::search(elite, config.elite_tabu_iterations, config.tabu_size, rng);
            if improved.fitness > elite.fitness {
                *elite = improved;
            }
        }

        while next.len() < config.population_size {
            let parent_a = tournament_select(&population, config.tournament_k, rng);
            let parent_b = tournament_select(&population, config.tournament_k, rng);

            let (mut child_a, mut child_b) = if rng.gen_bool(config.crossover_rate) {
                crossover(parent_a, parent_b, rng)
            } else {
                (parent_a.clone(), parent_b.clone())
            };

            if rng.gen_bool(mutation_rate) {
                mutate(&mut child_a, rng);
            }
            if rng.gen_bool(mutation_rate) {
                mutate(&mut child_b, rng);
            }

            let mut children = vec![child_a, child_b];
            children.par_iter_mut().for_each(|c| {
                c.rebuild_index();
                let report = fitness::evaluate(c);
                c.fitness = report.fitness;
            });
            next.extend(children);
        }

        next.truncate(config.population_size);
        population = next;

        if best_ever.fitness >= config.early_stop_fitness {
            info!(generation, fitness = best_ever.fitness, "early stop reached");
            break;
        }
    }

    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
    if population[0].fitness > best_ever.fitness {
        best_ever = population[0].clone();
    }

    (best_ever, warnings)
}

fn initial_population(
    input: &SolveInput,
    config: &SolverConfig,
    rng: &mut SolverRng,
) -> (Vec<Candidate>, Vec<String>) {
    let mut rngs: Vec<SolverRng> = (0..config.population_size as u64)
        .map(|i| rng.fork(i))
        .collect();

    let built: Vec<(Candidate, Vec<String>)> = rngs
        .par_iter_mut()
        .map(|r| initializer::construct(input, r))
        .collect();

    let mut warnings = Vec::new();
    let population = built
        .into_iter()
        .map(|(mut c, w)| {
            let report = fitness::evaluate(&c);
            c.fitness = report.fitness;
            warnings.extend(w);
            c
        })
        .collect();

    (population, warnings)
}

fn interpolate(start: f64, end: f64, generation: u32, total_generations: u32) -> f64 {
    if total_generations <= 1 {
        return end;
    }
    let t = generation as f64 / (total_generations - 1) as f64;
    start + (end - start) * t.min(1.0)
}

fn tournament_select<'a>(population: &'a [Candidate], k: usize, rng: &mut SolverRng) -> &'a Candidate {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..k {
        let challenger = &population[rng.gen_range(0..population.len())];
        if challenger.fitness > best.fitness {
            best = challenger;
        }
    }
    best
}

/// One-point crossover over the flat assignment list: a single cut point is
/// chosen uniformly in [1, min(|p1|, |p2|) - 1] and prefixes/suffixes are
/// swapped. The resulting multisets may contain duplicate or missing hours;
/// the fitness function penalizes this rather than the operator forbidding it.
fn crossover(parent_a: &Candidate, parent_b: &Candidate, rng: &mut SolverRng) -> (Candidate, Candidate) {
    let min_len = parent_a.assignments.len().min(parent_b.assignments.len());
    if min_len < 2 {
        return (parent_a.clone(), parent_b.clone());
    }
    let cut = rng.gen_range(1..min_len);

    let mut genes_a = parent_a.assignments[..cut].to_vec();
    genes_a.extend_from_slice(&parent_b.assignments[cut..]);

    let mut genes_b = parent_b.assignments[..cut].to_vec();
    genes_b.extend_from_slice(&parent_a.assignments[cut..]);

    (Candidate::new(genes_a), Candidate::new(genes_b))
}

/// Swap mutation: pick two distinct assignment indices and swap only their
/// (day, period) fields, leaving subject/faculty/room/batch untouched.
fn mutate(child: &mut Candidate, rng: &mut SolverRng) {
    let len = child.assignments.len();
    if len < 2 {
        return;
    }
    let i = rng.gen_range(0..len);
    let mut j = rng.gen_range(0..len);
    while j == i {
        j = rng.gen_range(0..len);
    }
    let (day_i, period_i) = (child.assignments[i].day, child.assignments[i].period);
    child.assignments[i].day = child.assignments[j].day;
    child.assignments[i].period = child.assignments[j].period;
    child.assignments[j].day = day_i;
    child.assignments[j].period = period_i;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faculty, LabRoom, Section, Subject, SubjectCode, SubjectType, TimetableConfig};

    fn toy_input() -> SolveInput {
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
    fn interpolation_bounds() {
        assert_eq!(interpolate(0.25, 0.05, 0, 10), 0.25);
        assert!((interpolate(0.25, 0.05, 9, 10) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn small_run_reaches_good_fitness() {
        let input = toy_input();
        let config = SolverConfig {
            population_size: 10,
            generations: 15,
            ..SolverConfig::default()
        };
        let mut rng = SolverRng::from_seed(42);
        let (best, _warnings) = run(&input, &config, &mut rng);
        assert!(best.fitness >= 900.0);
    }

    #[test]
    fn wall_clock_deadline_stops_early_and_warns() {
        let input = toy_input();
        let config = SolverConfig {
            population_size: 10,
            generations: 10_000,
            max_wall_clock_seconds: Some(0),
            ..SolverConfig::default()
        };
        let mut rng = SolverRng::from_seed(1);
        let (best, warnings) = run(&input, &config, &mut rng);
        assert!(best.fitness > 0.0);
        assert!(warnings.iter().any(|w| w.contains("wall-clock deadline")));
    }
}
