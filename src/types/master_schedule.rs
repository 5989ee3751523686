use super::{FacultyId, RoomId, SectionId};
use serde::{Deserialize, Serialize};

/// An already-committed assignment from another semester sharing the same
/// resource pool. The solver must respect these as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterScheduleEntry {
    pub day: u8,
    pub period: u8,
    pub faculty_id: FacultyId,
    pub section_id: SectionId,
    pub room_id: RoomId,
    pub is_theory: bool,
}
