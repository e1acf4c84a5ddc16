//! Record storage interface and its in-memory implementation.

use crate::models::{AddressRecord, Student};
use crate::processing::canonical_address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Persistence seam for address records and the students they are assigned to.
pub trait RecordStore {
    /// All records, in no particular order.
    fn records(&self) -> Vec<AddressRecord>;
    fn get(&self, id: Uuid) -> Option<AddressRecord>;
    fn find_by_address(&self, address: &str) -> Option<AddressRecord>;
    /// Insert or replace by id.
    fn save(&mut self, record: AddressRecord) -> AddressRecord;
    fn delete(&mut self, id: Uuid) -> Option<AddressRecord>;
    fn student(&self, id: i32) -> Option<Student>;

    fn exists_by_address(&self, address: &str) -> bool {
        self.find_by_address(address).is_some()
    }
}

/// Records and students held in ordered maps; serializable as a whole.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct MemoryStore {
    #[serde(default)]
    pub records: BTreeMap<Uuid, AddressRecord>,
    #[serde(default)]
    pub students: BTreeMap<i32, Student>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Register or replace a student.
    pub fn add_student(&mut self, student: Student) {
        log::debug!("add_student({}, {})", student.id, student.full_name());
        self.students.insert(student.id, student);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn records(&self) -> Vec<AddressRecord> {
        self.records.values().cloned().collect()
    }

    fn get(&self, id: Uuid) -> Option<AddressRecord> {
        self.records.get(&id).cloned()
    }

    /// Match on the canonical spelling, so `2A00::5` finds `2a00::5`.
    fn find_by_address(&self, address: &str) -> Option<AddressRecord> {
        let address = canonical_address(address);
        self.records
            .values()
            .find(|r| canonical_address(&r.address) == address)
            .cloned()
    }

    fn save(&mut self, record: AddressRecord) -> AddressRecord {
        self.records.insert(record.id, record.clone());
        record
    }

    fn delete(&mut self, id: Uuid) -> Option<AddressRecord> {
        self.records.remove(&id)
    }

    fn student(&self, id: i32) -> Option<Student> {
        self.students.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_get_delete() {
        let mut store = MemoryStore::new();
        let record = store.save(AddressRecord::new("10.0.0.1", None));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(record.id).unwrap().address, "10.0.0.1");
        assert!(store.exists_by_address(" 10.0.0.1 "));
        assert_eq!(store.delete(record.id).unwrap().id, record.id);
        assert!(store.is_empty());
        assert!(store.delete(record.id).is_none());
    }

    #[test]
    fn test_save_replaces_by_id() {
        let mut store = MemoryStore::new();
        let mut record = store.save(AddressRecord::new("10.0.0.1", None));
        record.assigned_student_id = Some(3);
        store.save(record.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(record.id).unwrap().assigned_student_id, Some(3));
    }

    #[test]
    fn test_find_by_address_ignores_ipv6_spelling() {
        let mut store = MemoryStore::new();
        let record = store.save(AddressRecord::new("2a00:1450::5", None));
        for spelling in ["2A00:1450::5", "2a00:1450:0:0:0:0:0:5", " 2a00:1450::0005 "] {
            assert_eq!(store.find_by_address(spelling).unwrap().id, record.id);
        }
        assert!(!store.exists_by_address("2a00:1450::6"));
    }

    #[test]
    fn test_students() {
        let mut store = MemoryStore::new();
        store.add_student(Student {
            id: 1,
            name: "Grace".to_string(),
            surname: "Hopper".to_string(),
        });
        assert_eq!(store.student(1).unwrap().full_name(), "Grace Hopper");
        assert!(store.student(2).is_none());
    }
}
