use super::RoomId;
use serde::{Deserialize, Serialize};

/// A laboratory room. Disjoint from classroom identifiers in practice, but
/// both share the `RoomId` keyspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabRoom {
    pub id: RoomId,
    pub name: String,
}
