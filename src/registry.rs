//! Address record management.
//!
//! [`AddressRegistry`] runs the classify, assignability and overlap checks
//! in front of a [`RecordStore`] and implements assignment to students.

use crate::error::{RegistryError, Result};
use crate::models::{AddressFamily, AddressKind, AddressRecord, RecordView};
use crate::processing::{
    canonical_address, check_assignable, classify, find_covering_block, find_overlapping_blocks,
    is_assignable, is_ip_in_block, is_valid_input, Expander,
};
use crate::store::RecordStore;
use chrono::Utc;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Description given to records created from an expanded block.
pub const AUTO_CREATED_DESCRIPTION: &str = "Automatically created IPv4 address";

/// Outcome of a successful dry-run validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub ip_count: usize,
    pub ips: Vec<String>,
    pub input_type: AddressKind,
    pub input_type_description: String,
}

/// A random assignment candidate: an unassigned record or an address inside a block.
#[derive(Debug, Clone)]
enum Candidate {
    Existing(AddressRecord),
    Expanded(String),
}

pub struct AddressRegistry<S: RecordStore> {
    store: S,
    expander: Expander,
}

impl<S: RecordStore> AddressRegistry<S> {
    pub fn new(store: S) -> AddressRegistry<S> {
        AddressRegistry::with_expander(store, Expander::default())
    }

    pub fn with_expander(store: S, expander: Expander) -> AddressRegistry<S> {
        AddressRegistry { store, expander }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// All records, newest first.
    pub fn find_all(&self) -> Vec<RecordView> {
        log::info!("Fetching all IP addresses (active and inactive)");
        self.views(|_| true)
    }

    /// Active records, newest first.
    pub fn find_all_active(&self) -> Vec<RecordView> {
        log::info!("Fetching active IP addresses");
        self.views(|r| r.is_active)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<RecordView> {
        let record = self.get_record(id)?;
        Ok(self.view(&record))
    }

    /// Active records whose address or description contains `term`.
    pub fn search(&self, term: &str) -> Vec<RecordView> {
        let term = term.trim();
        if term.is_empty() {
            return self.find_all_active();
        }
        log::info!("Searching IP addresses: {term}");
        self.views(|r| {
            r.is_active
                && (r.address.contains(term)
                    || r.description.as_deref().unwrap_or_default().contains(term))
        })
    }

    /// Active records not owned by any student. Inactive records are never offered.
    pub fn find_unassigned_active(&self) -> Vec<RecordView> {
        log::info!("Fetching unassigned active IP addresses");
        self.views(|r| r.is_active && !r.is_assigned())
    }

    /// Unassigned active IPv4 singles, CIDRs and ranges.
    pub fn find_unassigned_active_ipv4(&self) -> Vec<RecordView> {
        log::info!("Fetching unassigned active IPv4 addresses");
        self.views(|r| {
            r.is_active
                && !r.is_assigned()
                && classify(&r.address).family() == Some(AddressFamily::V4)
        })
    }

    pub fn exists_by_address(&self, address: &str) -> bool {
        self.store.exists_by_address(address)
    }

    /// Run the create checks without persisting anything.
    pub fn validate(&self, input: &str) -> Result<ValidationReport> {
        log::info!("Validating IP input: {input}");
        let (address, kind) = self.check_new_address(input, None)?;
        Ok(ValidationReport {
            valid: true,
            ip_count: 1,
            ips: vec![address],
            input_type: kind,
            input_type_description: kind.label().to_string(),
        })
    }

    /// Checks shared by create, update and validate. `exclude` skips the record being updated.
    fn check_new_address(
        &self,
        input: &str,
        exclude: Option<Uuid>,
    ) -> Result<(String, AddressKind)> {
        let canonical = canonical_address(input);
        let address = canonical.as_str();
        if !is_valid_input(address) {
            return Err(RegistryError::Validation(format!(
                "Invalid IP format: {address}"
            )));
        }
        let kind = classify(address);

        if kind.is_single() {
            check_assignable(address).map_err(|reason| {
                RegistryError::Validation(format!(
                    "This IP address cannot be registered ({reason}): {address}"
                ))
            })?;
        }

        let existing: Vec<String> = self
            .store
            .records()
            .into_iter()
            .filter(|r| Some(r.id) != exclude)
            .map(|r| canonical_address(&r.address))
            .collect();

        if existing.iter().any(|a| a == address) {
            return Err(RegistryError::Validation(format!(
                "This IP address already exists: {address}"
            )));
        }

        if kind.is_single() {
            if let Some(block) = find_covering_block(address, &existing) {
                return Err(RegistryError::Validation(format!(
                    "This IP address is inside an existing subnet or range: {address} ({block})"
                )));
            }
        }

        if matches!(kind, AddressKind::CidrV4 | AddressKind::RangeV4) {
            let overlapping = find_overlapping_blocks(address, &existing);
            if !overlapping.is_empty() {
                return Err(RegistryError::Validation(format!(
                    "{address} overlaps existing subnet or range: {}",
                    overlapping.join(", ")
                )));
            }
        }

        Ok((address.to_string(), kind))
    }

    /// Register a new active record.
    pub fn create(&mut self, input: &str, description: Option<&str>) -> Result<RecordView> {
        log::info!("Creating IP address: {input}");
        let (address, kind) = self.check_new_address(input, None)?;

        let description = description
            .map(|d| d.to_string())
            .unwrap_or_else(|| kind.describe(&address));
        let record = self
            .store
            .save(AddressRecord::new(&address, Some(description)));
        log::info!("IP address created: {} id={}", record.address, record.id);
        Ok(self.view(&record))
    }

    /// Change address, description or active flag of a record.
    pub fn update(
        &mut self,
        id: Uuid,
        input: Option<&str>,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<RecordView> {
        log::info!("Updating IP address id={id}");
        let mut record = self.get_record(id)?;

        if let Some(input) = input {
            if canonical_address(input) != canonical_address(&record.address) {
                let (address, _kind) = self.check_new_address(input, Some(id))?;
                record.address = address;
            }
        }
        if let Some(description) = description {
            record.description = Some(description.to_string());
        }
        if let Some(is_active) = is_active {
            record.is_active = is_active;
        }
        record.updated_at = Some(Utc::now());

        let record = self.store.save(record);
        log::info!(
            "IP address updated: {} active={}",
            record.address,
            record.is_active
        );
        Ok(self.view(&record))
    }

    /// Delete a record. Deleting a block also deletes the single records inside it.
    ///
    /// Returns the number of records removed.
    pub fn delete(&mut self, id: Uuid) -> Result<usize> {
        log::info!("Deleting IP address id={id}");
        let record = self.get_record(id)?;

        if !classify(&record.address).is_block() {
            self.store.delete(id);
            log::info!("Single IP address deleted: {}", record.address);
            return Ok(1);
        }

        log::info!(
            "Deleting subnet/range {} and the IP addresses registered inside it",
            record.address
        );
        let contained: Vec<AddressRecord> = self
            .store
            .records()
            .into_iter()
            .filter(|r| r.id != id)
            .filter(|r| classify(&r.address).is_single())
            .filter(|r| is_ip_in_block(&r.address, &record.address))
            .collect();

        for inner in &contained {
            self.store.delete(inner.id);
            log::info!(
                "IP address deleted: {} (student: {})",
                inner.address,
                self.student_name(inner.assigned_student_id)
            );
        }
        self.store.delete(id);
        log::info!("Subnet/range deleted: {}", record.address);
        log::info!("Deleted {} IP addresses in total", contained.len() + 1);
        Ok(contained.len() + 1)
    }

    /// Assign the given active records to a student.
    ///
    /// Inactive records are skipped. Nothing is assigned if any record belongs
    /// to another student. Returns the number of records assigned.
    pub fn assign_to_student(&mut self, student_id: i32, record_ids: &[Uuid]) -> Result<usize> {
        log::info!(
            "Assigning IP addresses to student id={student_id}, count={}",
            record_ids.len()
        );
        self.require_student(student_id)?;

        let records: Vec<AddressRecord> = record_ids
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect();
        if records.len() != record_ids.len() {
            return Err(RegistryError::NotFound(
                "Some IP addresses were not found".to_string(),
            ));
        }

        let (active, inactive): (Vec<AddressRecord>, Vec<AddressRecord>) =
            records.into_iter().partition(|r| r.is_active);
        if !inactive.is_empty() {
            log::warn!(
                "Skipping inactive IP addresses: {}",
                inactive.iter().map(|r| &r.address).join(", ")
            );
        }

        if let Some(taken) = active
            .iter()
            .find(|r| r.assigned_student_id.is_some_and(|owner| owner != student_id))
        {
            return Err(RegistryError::Validation(format!(
                "IP address {} is already assigned to {}",
                taken.address,
                self.student_name(taken.assigned_student_id)
            )));
        }

        let count = active.len();
        for mut record in active {
            record.assigned_student_id = Some(student_id);
            record.updated_at = Some(Utc::now());
            self.store.save(record);
        }
        log::info!("{count} IP addresses assigned to student id={student_id}");
        Ok(count)
    }

    /// Assign a random usable IPv4 address to a student.
    pub fn assign_random(&mut self, student_id: i32) -> Result<RecordView> {
        self.assign_random_with(student_id, &mut rand::thread_rng())
    }

    /// [`AddressRegistry::assign_random`] with a caller supplied random source.
    pub fn assign_random_with<R: Rng + ?Sized>(
        &mut self,
        student_id: i32,
        rng: &mut R,
    ) -> Result<RecordView> {
        log::info!("Assigning a random IPv4 address to student id={student_id}");
        self.require_student(student_id)?;

        let available: Vec<AddressRecord> = self
            .store
            .records()
            .into_iter()
            .filter(|r| r.is_active && !r.is_assigned())
            .sorted_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .collect();
        if available.is_empty() {
            return Err(RegistryError::NoAvailableAddress(
                "No assignable IP address found".to_string(),
            ));
        }

        let candidates = self.random_candidates(available);
        log::debug!("{} candidate IPv4 addresses", candidates.len());

        let chosen = candidates.choose(rng).cloned().ok_or_else(|| {
            RegistryError::NoAvailableAddress("No usable IPv4 address found".to_string())
        })?;

        let mut record = match chosen {
            Candidate::Existing(record) => record,
            Candidate::Expanded(address) => {
                AddressRecord::new(&address, Some(AUTO_CREATED_DESCRIPTION.to_string()))
            }
        };
        record.assigned_student_id = Some(student_id);
        record.updated_at = Some(Utc::now());
        let record = self.store.save(record);

        log::info!(
            "IPv4 address {} assigned to student id={student_id}",
            record.address
        );
        Ok(self.view(&record))
    }

    /// IPv4 singles plus expanded hosts of IPv4 blocks, each assignable and not yet registered.
    fn random_candidates(&self, available: Vec<AddressRecord>) -> Vec<Candidate> {
        let registered: HashSet<String> = self
            .store
            .records()
            .iter()
            .map(|r| canonical_address(&r.address))
            .collect();
        let mut candidates = Vec::new();
        let mut expanded = Vec::new();

        for record in available {
            match classify(&record.address) {
                AddressKind::SingleV4 => {
                    if is_assignable(&record.address) {
                        candidates.push(Candidate::Existing(record));
                    }
                }
                AddressKind::CidrV4 | AddressKind::RangeV4 => {
                    expanded.extend(self.expander.expand_v4_where(&record.address, |ip| {
                        is_assignable(ip) && !registered.contains(ip)
                    }))
                }
                kind => log::trace!("Skipping {} ({kind})", record.address),
            }
        }

        candidates.extend(expanded.into_iter().unique().map(Candidate::Expanded));
        candidates
    }

    fn get_record(&self, id: Uuid) -> Result<AddressRecord> {
        self.store
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(format!("IP address not found: {id}")))
    }

    fn require_student(&self, student_id: i32) -> Result<()> {
        self.store
            .student(student_id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound(format!("Student not found: {student_id}")))
    }

    fn student_name(&self, student_id: Option<i32>) -> String {
        match student_id {
            None => "unassigned".to_string(),
            Some(id) => self
                .store
                .student(id)
                .map(|s| s.full_name())
                .unwrap_or_else(|| format!("student {id}")),
        }
    }

    fn views<F>(&self, keep: F) -> Vec<RecordView>
    where
        F: Fn(&AddressRecord) -> bool,
    {
        let records = self.store.records();
        records
            .iter()
            .filter(|r| keep(r))
            .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
            .map(|r| view_of(r, &records))
            .collect()
    }

    /// Record with its assignment counters.
    pub fn view(&self, record: &AddressRecord) -> RecordView {
        view_of(record, &self.store.records())
    }
}

fn view_of(record: &AddressRecord, all: &[AddressRecord]) -> RecordView {
    let assigned_count = if classify(&record.address).is_block() {
        all.iter()
            .filter(|r| r.is_assigned() && classify(&r.address).is_single())
            .filter(|r| is_ip_in_block(&r.address, &record.address))
            .count()
    } else {
        usize::from(record.is_assigned())
    };
    RecordView {
        record: record.clone(),
        is_assigned: record.is_assigned(),
        assigned_count,
    }
}
