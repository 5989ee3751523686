//! Tabu-augmented local search: single-candidate hill climbing with a
//! short-term memory of recently reversed moves, used to escape shallow
//! local optima that crossover/mutation alone rarely find.

use crate::rng::SolverRng;
use crate::solver::fitness;
use crate::types::Candidate;
use std::collections::VecDeque;

/// Runs tabu search on a clone of `candidate` for up to `max_iterations`
/// rounds, each sampling up to 10 candidate swaps among theory assignments.
pub fn search(
    candidate: &Candidate,
    max_iterations: u32,
    tabu_size: usize,
    rng: &mut SolverRng,
) -> Candidate {
    let mut current = candidate.clone();
    if current.fitness <= 0.0 {
        let report = fitness::evaluate(&current);
        current.fitness = report.fitness;
    }

    let theory_indices: Vec<usize> = current
        .assignments
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_theory)
        .map(|(i, _)| i)
        .collect();
    if theory_indices.len() < 2 {
        return current;
    }

    let mut tabu: VecDeque<(usize, usize)> = VecDeque::with_capacity(tabu_size);

    for _ in 0..max_iterations {
        if current.fitness >= 1000.0 {
            break;
        }

        let mut best_pair: Option<(usize, usize)> = None;
        let mut best_fitness = current.fitness;

        for _ in 0..10 {
            let a = *rng.choose(&theory_indices).unwrap();
            let b = *rng.choose(&theory_indices).unwrap();
            if a == b {
                continue;
            }
            let (i, j) = if a < b { (a, b) } else { (b, a) };
            if tabu.contains(&(i, j)) {
                continue;
            }

            swap_slot(&mut current, i, j);
            current.rebuild_index();
            let report = fitness::evaluate(&current);
            let candidate_fitness = report.fitness;
            swap_slot(&mut current, i, j);
            current.rebuild_index();

            if candidate_fitness > best_fitness {
                best_fitness = candidate_fitness;
                best_pair = Some((i, j));
            }
        }

        match best_pair {
            Some((i, j)) => {
                swap_slot(&mut current, i, j);
                current.rebuild_index();
                current.fitness = best_fitness;
                tabu.push_back((i, j));
                if tabu.len() > tabu_size {
                    tabu.pop_front();
                }
            }
            None => break,
        }
    }

    current
}

fn swap_slot(candidate: &mut Candidate, i: usize, j: usize) {
    let day_i = candidate.assignments[i].day;
    let period_i = candidate.assignments[i].period;
    candidate.assignments[i].day = candidate.assignments[j].day;
    candidate.assignments[i].period = candidate.assignments[j].period;
    candidate.assignments[j].day = day_i;
    candidate.assignments[j].period = period_i;
}
