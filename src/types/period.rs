use serde::{Deserialize, Serialize};

/// Default number of teaching days per week (Mon-Sat).
pub const DEFAULT_DAYS: u8 = 6;
/// Default number of periods per day.
pub const DEFAULT_PERIODS: u8 = 7;
/// Morning periods, [0..3] inclusive (periods 0, 1, 2, 3).
pub const MORNING_PERIODS: std::ops::Range<u8> = 0..4;
/// Afternoon periods, [4..6] inclusive (periods 4, 5, 6).
pub const AFTERNOON_PERIODS: std::ops::Range<u8> = 4..7;

/// A specific (day, period) slot in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Day of week, 0-indexed (0 = Monday).
    pub day: u8,
    /// Period within the day, 0-indexed.
    pub period: u8,
}

impl Period {
    pub fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }

    pub fn is_afternoon(&self) -> bool {
        AFTERNOON_PERIODS.contains(&self.period)
    }

    pub fn is_morning(&self) -> bool {
        MORNING_PERIODS.contains(&self.period)
    }

    pub fn day_name(&self) -> &'static str {
        match self.day {
            0 => "Monday",
            1 => "Tuesday",
            2 => "Wednesday",
            3 => "Thursday",
            4 => "Friday",
            5 => "Saturday",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}P{}", self.day + 1, self.period + 1)
    }
}
