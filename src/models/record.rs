//! Address record and student data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a registered record.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecordState {
    Active,
    Inactive,
}

/// A registered address: single IP, CIDR subnet or range, stored unexpanded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddressRecord {
    /// Generated identity.
    pub id: Uuid,
    /// Address token as entered (trimmed).
    pub address: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Student owning this record, only ever set on single address records.
    #[serde(default)]
    pub assigned_student_id: Option<i32>,
}

impl AddressRecord {
    /// Create a new active, unassigned record.
    pub fn new(address: &str, description: Option<String>) -> AddressRecord {
        AddressRecord {
            id: Uuid::new_v4(),
            address: address.to_string(),
            description,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            assigned_student_id: None,
        }
    }

    pub fn state(&self) -> RecordState {
        if self.is_active {
            RecordState::Active
        } else {
            RecordState::Inactive
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_student_id.is_some()
    }
}

/// A record together with its derived assignment information.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordView {
    #[serde(flatten)]
    pub record: AddressRecord,
    pub is_assigned: bool,
    /// Singles: 1 or 0. Blocks: registered singles inside the block owned by a student.
    pub assigned_count: usize,
}

/// Student that addresses can be assigned to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub surname: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}
