use crate::error::Result;
use crate::solver::TimetableResult;
use serde::{Deserialize, Serialize};

/// The §6 output document: the full assignment list plus the result envelope.
/// Owns its data (rather than borrowing) so it round-trips through both
/// `generate_json_report` and the `report` subcommand's re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResult {
    pub timetable: Vec<crate::types::Assignment>,
    pub fitness: f64,
    pub success: bool,
    pub warnings: Vec<String>,
    pub generated_at: String,
}

impl From<&TimetableResult> for JsonResult {
    fn from(result: &TimetableResult) -> Self {
        Self {
            timetable: result.timetable.clone(),
            fitness: result.fitness,
            success: result.success,
            warnings: result.warnings.clone(),
            generated_at: result.generated_at.clone(),
        }
    }
}

impl From<JsonResult> for TimetableResult {
    fn from(wire: JsonResult) -> Self {
        Self {
            timetable: wire.timetable,
            fitness: wire.fitness,
            success: wire.success,
            warnings: wire.warnings,
            generated_at: wire.generated_at,
        }
    }
}

pub fn generate_json_report(result: &TimetableResult) -> Result<String> {
    let wire = JsonResult::from(result);
    Ok(serde_json::to_string_pretty(&wire)?)
}

/// Summary-only JSON, for the `--quiet` CLI path.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total_assignments: usize,
    pub fitness: f64,
    pub success: bool,
    pub warning_count: usize,
}

pub fn generate_json_summary(result: &TimetableResult) -> Result<String> {
    let summary = JsonSummary {
        total_assignments: result.timetable.len(),
        fitness: result.fitness,
        success: result.success,
        warning_count: result.warnings.len(),
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignment, FacultyId, RoomId, SectionId, SubjectCode, SubjectType};

    fn sample_result() -> TimetableResult {
        TimetableResult {
            timetable: vec![Assignment {
                day: 0,
                period: 0,
                subject_code: SubjectCode("X".into()),
                subject_name: "Data Structures".into(),
                subject_type: SubjectType::CoreTheory,
                faculty_id: FacultyId("F1".into()),
                section_id: SectionId("6_A".into()),
                room_id: RoomId("R1".into()),
                batch_number: 0,
                is_theory: true,
            }],
            fitness: 965.0,
            success: true,
            warnings: vec![],
            generated_at: "2026-07-28T00:00:00+00:00".into(),
        }
    }

    /// The summary is flat (no nested arrays), so its pretty-printed form is
    /// stable enough to pin with an inline snapshot.
    #[test]
    fn json_summary_matches_snapshot() {
        let result = sample_result();
        let summary = generate_json_summary(&result).unwrap();
        insta::assert_snapshot!(summary, @r###"
        {
          "total_assignments": 1,
          "fitness": 965.0,
          "success": true,
          "warning_count": 0
        }
        "###);
    }

    /// The full report nests an array of assignments; round-trip it through
    /// `serde_json::Value` instead of pinning exact whitespace.
    #[test]
    fn json_report_round_trips_every_field() {
        let result = sample_result();
        let report = generate_json_report(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["fitness"], 965.0);
        assert_eq!(value["success"], true);
        assert_eq!(value["timetable"].as_array().unwrap().len(), 1);
        let a = &value["timetable"][0];
        assert_eq!(a["subject_code"], "X");
        assert_eq!(a["subject_type"], "PCC");
        assert_eq!(a["section_id"], "6_A");
        assert_eq!(a["is_theory"], true);
    }
}
