//! Hybrid metaheuristic university timetable generator: a constraint-index
//! backed constructive initializer, a genetic algorithm population loop,
//! tabu-augmented local search, and a lab-continuity repair pass.

pub mod error;
pub mod index;
pub mod parser;
pub mod reporter;
pub mod rng;
pub mod solver;
pub mod types;

pub use error::{Result, SchedulerError};
pub use solver::{generate, generate_with_retry, SolverConfig, TimetableResult};
