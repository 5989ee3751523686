use super::{RoomId, SectionId};
use serde::{Deserialize, Serialize};

/// A cohort of students that moves together through theory classes; for
/// parallel-lab sessions a section splits into batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub semester: String,
    pub classroom: RoomId,
}
