use super::{FacultyId, Period, RoomId, SectionId, SubjectCode, SubjectType};
use serde::{Deserialize, Serialize};

/// The atomic scheduled unit: one hour of one subject for one section (and,
/// for parallel labs, one batch) in one room with one faculty member. This
/// is the "gene" the evolutionary operators recombine and mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub day: u8,
    pub period: u8,
    pub subject_code: SubjectCode,
    pub subject_name: String,
    pub subject_type: SubjectType,
    pub faculty_id: FacultyId,
    pub section_id: SectionId,
    pub room_id: RoomId,
    /// 0 = whole section, 1..=B = parallel lab batch.
    pub batch_number: u32,
    pub is_theory: bool,
}

impl Assignment {
    pub fn slot(&self) -> Period {
        Period::new(self.day, self.period)
    }

    /// Key identifying "one lab/project session" this assignment belongs to:
    /// all hours of one session share subject, section, batch, and day.
    pub fn session_key(&self) -> (SubjectCode, SectionId, u32, u8) {
        (
            self.subject_code.clone(),
            self.section_id.clone(),
            self.batch_number,
            self.day,
        )
    }
}
