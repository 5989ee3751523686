use super::FacultyId;
use serde::{Deserialize, Serialize};

/// A faculty member. Immutable within a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
}
