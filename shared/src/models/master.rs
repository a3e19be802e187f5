//! Master-data records (sales reps, customers, items)

use serde::{Deserialize, Serialize};

use super::metric::UniverseEntry;

/// Opaque id/name pair served by the master-data lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MasterRecord {
    pub id: String,
    pub name: String,
}

impl MasterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&MasterRecord> for UniverseEntry {
    fn from(r: &MasterRecord) -> Self {
        UniverseEntry::new(r.id.clone(), r.name.clone())
    }
}
