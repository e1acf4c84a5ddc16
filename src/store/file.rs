//! JSON file persistence for [`MemoryStore`].

use super::memory::MemoryStore;
use std::error::Error;
use std::path::Path;

/// Read the store from a JSON file, or start empty if the file doesn't exist.
///
/// # Arguments
/// * `store_file` - Path of the JSON file
///
/// # Returns
/// * `Ok(MemoryStore)` - The stored records and students
/// * `Err` - If the file exists but can't be read or parsed
pub fn load_store(store_file: &str) -> Result<MemoryStore, Box<dyn Error>> {
    if !Path::new(store_file).exists() {
        log::warn!("Store file not found: {store_file}, starting with an empty store");
        return Ok(MemoryStore::new());
    }

    log::info!("Reading from store file: {store_file}");
    let json = std::fs::read_to_string(store_file)
        .map_err(|e| format!("Error reading store file {store_file}: {e}"))?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let store: MemoryStore = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing store file {store_file}: path={} error={}",
            e.path(),
            e
        )
    })?;

    log::info!(
        "Loaded {} records and {} students",
        store.records.len(),
        store.students.len()
    );
    Ok(store)
}

/// Write the store to a JSON file, replacing its content.
pub fn save_store(store: &MemoryStore, store_file: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(store)
        .map_err(|e| format!("Error serializing store: {e}"))?;
    log::info!(
        "Writing {} records to store file: {store_file}",
        store.records.len()
    );
    std::fs::write(store_file, json)
        .map_err(|e| format!("Error writing store file {store_file}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressRecord, Student};
    use crate::store::RecordStore;

    fn temp_file(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("{name}_{}.json", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let store = load_store(&temp_file("missing")).expect("Error loading store");
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let file = temp_file("store");
        let mut store = MemoryStore::new();
        let record = store.save(AddressRecord::new("10.0.0.0/24", Some("lab".to_string())));
        store.add_student(Student {
            id: 5,
            name: "Alan".to_string(),
            surname: "Turing".to_string(),
        });
        save_store(&store, &file).expect("Error saving store");

        let loaded = load_store(&file).expect("Error loading store");
        assert_eq!(loaded.get(record.id), Some(record));
        assert_eq!(loaded.student(5).unwrap().surname, "Turing");
        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_parse_error_names_path() {
        let file = temp_file("broken");
        std::fs::write(&file, r#"{"records": {"not-a-uuid": {}}}"#).unwrap();
        let err = load_store(&file).unwrap_err().to_string();
        assert!(err.contains("path=records"), "unexpected error: {err}");
        std::fs::remove_file(&file).ok();
    }
}
