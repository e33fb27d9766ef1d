use crate::domain::model::{Car, CarRecord};
use crate::domain::ports::Storage;
use crate::utils::error::{ListingError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Version written by [`Persistence::save`].
pub const SCHEMA_VERSION: u32 = 1;

/// Version assigned to the unversioned bare-array layout.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    listings: T,
}

/// Result of reading the listing slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub cars: Vec<Car>,
    /// Entries dropped because they failed to parse or revalidate.
    pub skipped: usize,
    /// Set when the blob was stored under an older schema version.
    pub migrated_from: Option<u32>,
}

/// Serialize/deserialize boundary between the listing collection and a
/// storage slot. Holds no listing state.
#[derive(Debug, Clone)]
pub struct Persistence<S: Storage> {
    storage: S,
    slot: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self, current_year: i32) -> Result<LoadReport> {
        let Some(blob) = self.storage.read(&self.slot)? else {
            tracing::debug!("Slot '{}' is empty", self.slot);
            return Ok(LoadReport::default());
        };

        let value: Value = serde_json::from_str(&blob).map_err(|e| ListingError::CorruptData {
            reason: format!("slot '{}' is not valid JSON: {}", self.slot, e),
        })?;

        let (version, entries) = split_envelope(value)?;
        let mut report = decode_entries(entries, current_year);
        if version != SCHEMA_VERSION {
            tracing::info!(
                "Migrating slot '{}' from schema v{} to v{}",
                self.slot,
                version,
                SCHEMA_VERSION
            );
            report.migrated_from = Some(version);
        }

        if report.skipped > 0 {
            tracing::warn!(
                "Skipped {} unreadable listing(s) in slot '{}'",
                report.skipped,
                self.slot
            );
        }
        tracing::info!("Loaded {} listing(s) from slot '{}'", report.cars.len(), self.slot);

        Ok(report)
    }

    pub fn save(&self, cars: &[Car]) -> Result<()> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            listings: cars.iter().map(CarRecord::from).collect::<Vec<_>>(),
        };
        let blob = serde_json::to_string(&envelope).map_err(|e| ListingError::PersistenceWrite {
            reason: e.to_string(),
        })?;

        self.storage.write(&self.slot, &blob).map_err(|e| match e {
            ListingError::PersistenceWrite { .. } => e,
            other => ListingError::PersistenceWrite {
                reason: other.to_string(),
            },
        })?;

        tracing::debug!("Saved {} listing(s) to slot '{}'", cars.len(), self.slot);
        Ok(())
    }
}

fn split_envelope(value: Value) -> Result<(u32, Vec<Value>)> {
    match value {
        Value::Array(entries) => Ok((LEGACY_SCHEMA_VERSION, entries)),
        Value::Object(mut obj) => {
            let version = obj
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| ListingError::CorruptData {
                    reason: "missing or non-numeric schema version".to_string(),
                })?;
            if version != u64::from(SCHEMA_VERSION) {
                return Err(ListingError::CorruptData {
                    reason: format!("unsupported schema version {}", version),
                });
            }
            match obj.remove("listings") {
                Some(Value::Array(entries)) => Ok((SCHEMA_VERSION, entries)),
                _ => Err(ListingError::CorruptData {
                    reason: "'listings' is not an array".to_string(),
                }),
            }
        }
        other => Err(ListingError::CorruptData {
            reason: format!("expected an object or array, found {}", json_kind(&other)),
        }),
    }
}

fn decode_entries(entries: Vec<Value>, current_year: i32) -> LoadReport {
    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for (position, entry) in entries.into_iter().enumerate() {
        let car = serde_json::from_value::<CarRecord>(entry)
            .map_err(ListingError::from)
            .and_then(|record| Car::from_record(record, current_year));

        match car {
            Ok(car) if seen.insert(car.license_plate().to_string()) => report.cars.push(car),
            Ok(car) => {
                tracing::warn!(
                    "Dropping duplicate listing {} at position {}",
                    car.license_plate(),
                    position
                );
                report.skipped += 1;
            }
            Err(e) => {
                tracing::warn!("Dropping listing at position {}: {}", position, e);
                report.skipped += 1;
            }
        }
    }

    report
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    const YEAR: i32 = 2024;

    fn car(plate: &str, year: i32) -> Car {
        Car::new(plate, "Volvo", "V70", "Ada", year, "Red", 1000.0, YEAR).unwrap()
    }

    fn persistence_with(blob: &str) -> Persistence<MemoryStorage> {
        let storage = MemoryStorage::new();
        storage.write("cars", blob).unwrap();
        Persistence::new(storage, "cars")
    }

    #[test]
    fn test_empty_slot_loads_nothing() {
        let persistence = Persistence::new(MemoryStorage::new(), "cars");
        assert_eq!(persistence.load(YEAR).unwrap(), LoadReport::default());
    }

    #[test]
    fn test_save_writes_versioned_envelope() {
        let persistence = Persistence::new(MemoryStorage::new(), "cars");
        persistence.save(&[car("ABC123", 2000)]).unwrap();

        let blob = persistence.storage().read("cars").unwrap().unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["listings"][0]["licensePlate"], "ABC123");
        assert_eq!(value["listings"][0]["maker"], "Volvo");
    }

    #[test]
    fn test_legacy_array_is_migrated() {
        let persistence = persistence_with(
            r#"[{"licensePlate":"ABC123","maker":"Volvo","model":"V70","owner":"Ada","year":2000,"color":"Red","price":1000}]"#,
        );
        let report = persistence.load(YEAR).unwrap();
        assert_eq!(report.cars, vec![car("ABC123", 2000)]);
        assert_eq!(report.migrated_from, Some(LEGACY_SCHEMA_VERSION));
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let persistence = persistence_with("{not json");
        assert!(matches!(
            persistence.load(YEAR),
            Err(ListingError::CorruptData { .. })
        ));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let persistence = persistence_with(r#"{"version":7,"listings":[]}"#);
        assert!(matches!(
            persistence.load(YEAR),
            Err(ListingError::CorruptData { .. })
        ));
    }

    #[test]
    fn test_bad_entries_are_skipped_and_counted() {
        let persistence = persistence_with(
            r#"{"version":1,"listings":[
                {"licensePlate":"ABC123","maker":"Volvo","model":"V70","owner":"Ada","year":2000,"color":"Red","price":1000},
                {"licensePlate":"BAD","maker":"Volvo","model":"V70","owner":"Ada","year":2000,"color":"Red","price":1000},
                {"licensePlate":"XYZ789","maker":"Volvo"},
                {"licensePlate":"abc123","maker":"Volvo","model":"V70","owner":"Bo","year":2001,"color":"Blue","price":5},
                {"licensePlate":"DEF456","maker":"Volvo","model":"V70","owner":"Ada","year":2010,"color":"Red","price":1000}
            ]}"#,
        );
        let report = persistence.load(YEAR).unwrap();
        let plates: Vec<&str> = report.cars.iter().map(Car::license_plate).collect();
        assert_eq!(plates, vec!["ABC123", "DEF456"]);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.migrated_from, None);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let persistence = Persistence::new(MemoryStorage::with_quota(8), "cars");
        assert!(matches!(
            persistence.save(&[car("ABC123", 2000)]),
            Err(ListingError::PersistenceWrite { .. })
        ));
    }
}
