use super::{Faculty, LabRoom, MasterScheduleEntry, Section, Subject};
use crate::index::ConstraintIndex;
use serde::{Deserialize, Serialize};

use super::{AFTERNOON_PERIODS, DEFAULT_DAYS, DEFAULT_PERIODS, MORNING_PERIODS};

/// Grid dimensions and period split, configurable per §3 defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableConfig {
    #[serde(default = "default_days")]
    pub days_per_week: u8,
    #[serde(default = "default_periods")]
    pub periods_per_day: u8,
    #[serde(default = "default_morning_end")]
    pub morning_periods_end: u8,
}

fn default_days() -> u8 {
    DEFAULT_DAYS
}
fn default_periods() -> u8 {
    DEFAULT_PERIODS
}
fn default_morning_end() -> u8 {
    MORNING_PERIODS.end
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            days_per_week: DEFAULT_DAYS,
            periods_per_day: DEFAULT_PERIODS,
            morning_periods_end: MORNING_PERIODS.end,
        }
    }
}

impl TimetableConfig {
    pub fn is_morning(&self, period: u8) -> bool {
        period < self.morning_periods_end
    }

    pub fn is_afternoon(&self, period: u8) -> bool {
        !self.is_morning(period) && period < self.periods_per_day
    }

    pub fn morning_periods(&self) -> std::ops::Range<u8> {
        0..self.morning_periods_end
    }

    pub fn afternoon_periods(&self) -> std::ops::Range<u8> {
        self.morning_periods_end..self.periods_per_day
    }
}

/// All reference data for one solve, read-only for the duration of the run.
#[derive(Debug, Clone)]
pub struct SolveInput {
    pub subjects: Vec<Subject>,
    pub faculties: Vec<Faculty>,
    pub sections: Vec<Section>,
    pub lab_rooms: Vec<LabRoom>,
    pub master_schedule: Vec<MasterScheduleEntry>,
    pub config: TimetableConfig,
}

/// Default afternoon periods as a plain range, independent of config — kept
/// for call sites that only need the §3 defaults (e.g. the fitness
/// evaluator's project-block check, which is defined in terms of the fixed
/// {4,5,6} window regardless of a non-default grid).
pub fn default_afternoon() -> std::ops::Range<u8> {
    AFTERNOON_PERIODS
}

use super::Assignment;

/// An unordered multiset of assignments plus a cached fitness score and a
/// constraint index derived from it. The candidate/chromosome under
/// consideration by the evolutionary operators.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub assignments: Vec<Assignment>,
    pub fitness: f64,
    pub index: ConstraintIndex,
}

impl Candidate {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        let mut index = ConstraintIndex::new();
        index.rebuild_from(&assignments);
        Self {
            assignments,
            fitness: 0.0,
            index,
        }
    }

    pub fn rebuild_index(&mut self) {
        self.index.rebuild_from(&self.assignments);
    }
}
