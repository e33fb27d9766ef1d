use crate::core::persistence::Persistence;
use crate::core::query;
use crate::domain::catalog::Catalog;
use crate::domain::model::{current_year, Car, CarFields, FIRST_CAR_YEAR};
use crate::domain::ports::Storage;
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::{
    normalize_plate, parse_price, parse_year, validate_license_plate, validate_non_empty_string,
};

/// Authoritative, insertion-ordered listing collection with write-through
/// persistence.
///
/// Every mutation runs validate → mutate → persist. If the persist step
/// fails the mutation is rolled back, so the collection always matches the
/// last successful save.
#[derive(Debug)]
pub struct ListingStore<S: Storage> {
    cars: Vec<Car>,
    persistence: Persistence<S>,
    catalog: Catalog,
    current_year: i32,
    skipped_on_load: usize,
    load_warning: Option<ListingError>,
}

impl<S: Storage> ListingStore<S> {
    pub fn open(persistence: Persistence<S>, catalog: Catalog) -> Result<Self> {
        Self::open_at(persistence, catalog, current_year())
    }

    /// Opens the store with a fixed notion of the current year.
    pub fn open_at(persistence: Persistence<S>, catalog: Catalog, current_year: i32) -> Result<Self> {
        let mut store = Self {
            cars: Vec::new(),
            persistence,
            catalog,
            current_year,
            skipped_on_load: 0,
            load_warning: None,
        };

        match store.persistence.load(current_year) {
            Ok(report) => {
                store.cars = report.cars;
                store.skipped_on_load = report.skipped;
            }
            Err(e @ ListingError::CorruptData { .. }) => {
                // start empty; the blob is left alone until the next mutation
                tracing::warn!("Starting with no listings: {}", e);
                store.load_warning = Some(e);
            }
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    pub fn create(&mut self, fields: &CarFields) -> Result<Car> {
        let car = self.validate(fields)?;

        self.cars.push(car.clone());
        if let Err(e) = self.persistence.save(&self.cars) {
            self.cars.pop();
            tracing::warn!("Rolled back new listing {}: {}", car.license_plate(), e);
            return Err(e);
        }

        tracing::info!(
            "Created listing {} ({} {}, {})",
            car.license_plate(),
            car.maker(),
            car.model(),
            car.year()
        );
        Ok(car)
    }

    /// Removes the listing with the given plate. Rows in a filtered or
    /// searched view are addressed by plate, never by position.
    pub fn delete(&mut self, plate: &str) -> Result<Car> {
        let plate = normalize_plate(plate);
        let index = query::position_of(&self.cars, &plate)
            .ok_or_else(|| ListingError::NotFound { plate: plate.clone() })?;

        let car = self.cars.remove(index);
        if let Err(e) = self.persistence.save(&self.cars) {
            self.cars.insert(index, car);
            tracing::warn!("Rolled back deletion of {}: {}", plate, e);
            return Err(e);
        }

        tracing::info!("Deleted listing {}", plate);
        Ok(car)
    }

    pub fn find_by_plate(&self, plate: &str) -> Option<&Car> {
        query::position_of(&self.cars, plate).map(|i| &self.cars[i])
    }

    pub fn filter_older_than_ten_years(&self) -> Vec<Car> {
        query::older_than_ten_years(&self.cars, self.current_year)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn skipped_on_load(&self) -> usize {
        self.skipped_on_load
    }

    /// Corrupt-blob error recovered from at startup, if any.
    pub fn load_warning(&self) -> Option<&ListingError> {
        self.load_warning.as_ref()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn validate(&self, fields: &CarFields) -> Result<Car> {
        let plate = normalize_plate(&fields.license_plate);
        if self.find_by_plate(&plate).is_some() {
            return Err(ListingError::DuplicateKey { plate });
        }
        validate_license_plate("licensePlate", &plate)?;
        validate_non_empty_string("owner", &fields.owner)?;
        let year = parse_year("year", &fields.year, FIRST_CAR_YEAR, self.current_year)?;
        let price = parse_price("price", &fields.price)?;

        validate_non_empty_string("maker", &fields.maker)?;
        let maker = self.catalog.resolve_maker(&fields.maker).ok_or_else(|| {
            ListingError::format("maker", fields.maker.trim(), "not a maker we sell")
        })?;
        validate_non_empty_string("model", &fields.model)?;
        let (maker, model) = self.catalog.resolve(maker, &fields.model).ok_or_else(|| {
            ListingError::format(
                "model",
                fields.model.trim(),
                format!("not a {} model", maker),
            )
        })?;

        Car::new(
            &plate,
            maker,
            model,
            &fields.owner,
            year,
            &fields.color,
            price,
            self.current_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    const YEAR: i32 = 2024;

    fn fields(plate: &str, year: &str) -> CarFields {
        CarFields {
            license_plate: plate.to_string(),
            maker: "Volvo".to_string(),
            model: "V70".to_string(),
            owner: "Ada Lovelace".to_string(),
            year: year.to_string(),
            color: "Red".to_string(),
            price: "12000".to_string(),
        }
    }

    fn open(storage: MemoryStorage) -> ListingStore<MemoryStorage> {
        ListingStore::open_at(Persistence::new(storage, "cars"), Catalog::default(), YEAR).unwrap()
    }

    #[test]
    fn test_create_then_find() {
        let mut store = open(MemoryStorage::new());
        let created = store.create(&fields("abc123", "2000")).unwrap();

        let found = store.find_by_plate(" ABC123 ").unwrap();
        assert_eq!(found, &created);
        assert_eq!(found.owner(), "Ada Lovelace");
        assert_eq!(found.year(), 2000);
        assert_eq!(found.price(), 12000.0);
    }

    #[test]
    fn test_duplicate_plate_any_case() {
        let mut store = open(MemoryStorage::new());
        store.create(&fields("ABC123", "2000")).unwrap();

        for plate in ["ABC123", "abc123", " aBc123 "] {
            assert!(matches!(
                store.create(&fields(plate, "2001")),
                Err(ListingError::DuplicateKey { .. })
            ));
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejections_use_taxonomy() {
        let mut store = open(MemoryStorage::new());

        let err = store.create(&fields("AB123", "2000")).unwrap_err();
        assert!(matches!(err, ListingError::Format { ref field, .. } if field == "licensePlate"));

        let mut blank_owner = fields("ABC123", "2000");
        blank_owner.owner = "   ".to_string();
        let err = store.create(&blank_owner).unwrap_err();
        assert!(matches!(err, ListingError::Format { ref field, .. } if field == "owner"));

        assert!(matches!(
            store.create(&fields("ABC123", "1885")),
            Err(ListingError::Range { .. })
        ));
        assert!(matches!(
            store.create(&fields("ABC123", "2025")),
            Err(ListingError::Range { .. })
        ));
        assert!(matches!(
            store.create(&fields("ABC123", "")),
            Err(ListingError::Range { .. })
        ));

        let mut negative = fields("ABC123", "2000");
        negative.price = "-5".to_string();
        assert!(matches!(store.create(&negative), Err(ListingError::Range { .. })));

        assert!(store.is_empty());
    }

    #[test]
    fn test_catalog_membership() {
        let mut store = open(MemoryStorage::new());

        let mut unknown_maker = fields("ABC123", "2000");
        unknown_maker.maker = "Lada".to_string();
        assert!(matches!(
            store.create(&unknown_maker),
            Err(ListingError::Format { ref field, .. }) if field == "maker"
        ));

        let mut wrong_model = fields("ABC123", "2000");
        wrong_model.model = "Corolla".to_string();
        assert!(matches!(
            store.create(&wrong_model),
            Err(ListingError::Format { ref field, .. }) if field == "model"
        ));

        let mut lowercase = fields("ABC123", "2000");
        lowercase.maker = "volvo".to_string();
        lowercase.model = "xc90".to_string();
        let car = store.create(&lowercase).unwrap();
        assert_eq!((car.maker(), car.model()), ("Volvo", "XC90"));
    }

    #[test]
    fn test_delete_by_plate() {
        let mut store = open(MemoryStorage::new());
        store.create(&fields("AAA111", "2000")).unwrap();
        store.create(&fields("BBB222", "2023")).unwrap();

        let removed = store.delete("aaa111").unwrap();
        assert_eq!(removed.license_plate(), "AAA111");
        assert!(matches!(
            store.delete("AAA111"),
            Err(ListingError::NotFound { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let storage = MemoryStorage::new();
        let mut store = open(storage.clone());
        store.create(&fields("AAA111", "2000")).unwrap();

        storage.set_quota(Some(1)).unwrap();
        assert!(matches!(
            store.create(&fields("BBB222", "2000")),
            Err(ListingError::PersistenceWrite { .. })
        ));
        assert!(matches!(
            store.delete("AAA111"),
            Err(ListingError::PersistenceWrite { .. })
        ));

        let plates: Vec<&str> = store.cars().iter().map(Car::license_plate).collect();
        assert_eq!(plates, vec!["AAA111"]);
    }

    #[test]
    fn test_corrupt_blob_starts_empty() {
        let storage = MemoryStorage::new();
        storage.write("cars", "definitely not json").unwrap();

        let store = open(storage.clone());
        assert!(store.is_empty());
        assert!(matches!(
            store.load_warning(),
            Some(ListingError::CorruptData { .. })
        ));
        assert_eq!(
            storage.read("cars").unwrap().as_deref(),
            Some("definitely not json")
        );
    }

    #[test]
    fn test_filter_older_than_ten_years() {
        let mut store = open(MemoryStorage::new());
        store.create(&fields("AAA111", "2014")).unwrap();
        store.create(&fields("BBB222", "2013")).unwrap();
        store.create(&fields("CCC333", "1990")).unwrap();

        let plates: Vec<String> = store
            .filter_older_than_ten_years()
            .iter()
            .map(|c| c.license_plate().to_string())
            .collect();
        assert_eq!(plates, vec!["BBB222", "CCC333"]);
        assert_eq!(store.len(), 3);
    }
}
