use dealer_listings::{
    Car, CarFields, Catalog, DisplayState, ListingEngine, ListingError, ListingStore,
    MemoryStorage, Persistence, SearchResult, Severity, View, ViewMode,
};

const YEAR: i32 = 2024;

#[derive(Default)]
struct RecordingView {
    rendered: Vec<Car>,
    highlight: Option<usize>,
    render_count: usize,
    messages: Vec<(String, Severity)>,
}

impl RecordingView {
    fn plates(&self) -> Vec<&str> {
        self.rendered.iter().map(Car::license_plate).collect()
    }
}

impl View for RecordingView {
    fn render(&mut self, cars: &[Car], highlight: Option<usize>) {
        self.rendered = cars.to_vec();
        self.highlight = highlight;
        self.render_count += 1;
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.messages.push((message.to_string(), severity));
    }
}

fn car_fields(plate: &str, year: i32) -> CarFields {
    CarFields {
        license_plate: plate.to_string(),
        maker: "Toyota".to_string(),
        model: "Corolla".to_string(),
        owner: "Linus".to_string(),
        year: year.to_string(),
        color: "Blue".to_string(),
        price: "9000".to_string(),
    }
}

fn engine_with(
    storage: MemoryStorage,
    cars: &[(&str, i32)],
) -> ListingEngine<MemoryStorage, RecordingView> {
    let store = ListingStore::open_at(
        Persistence::new(storage, "cars"),
        Catalog::default(),
        YEAR,
    )
    .unwrap();
    let mut engine = ListingEngine::new(store, RecordingView::default());
    engine.start();
    for (plate, year) in cars {
        engine.create(&car_fields(plate, *year)).unwrap();
    }
    engine
}

/// 在篩選後的畫面刪除，必須刪到正確的那一筆
#[test]
fn test_delete_in_filtered_view_removes_displayed_car() {
    let mut engine = engine_with(
        MemoryStorage::new(),
        &[("AAA000", 2000), ("BBB000", 2023), ("CCC000", 1990)],
    );

    engine.toggle_discount_filter(true);
    assert_eq!(engine.view().plates(), vec!["AAA000", "CCC000"]);

    let removed = engine.delete(1).unwrap();
    assert_eq!(removed.license_plate(), "CCC000");

    let remaining: Vec<&str> = engine.store().cars().iter().map(Car::license_plate).collect();
    assert_eq!(remaining, vec!["AAA000", "BBB000"]);
    assert_eq!(engine.view().plates(), vec!["AAA000"]);
}

#[test]
fn test_delete_is_persisted() {
    let storage = MemoryStorage::new();
    let mut engine = engine_with(storage.clone(), &[("AAA000", 2000), ("BBB000", 2023)]);
    engine.delete(0).unwrap();

    let reopened = ListingStore::open_at(
        Persistence::new(storage, "cars"),
        Catalog::default(),
        YEAR,
    )
    .unwrap();
    assert_eq!(reopened.cars(), engine.store().cars());
}

#[test]
fn test_delete_out_of_range_row() {
    let mut engine = engine_with(MemoryStorage::new(), &[("AAA000", 2000)]);
    engine.toggle_discount_filter(true);

    let err = engine.delete(1).unwrap_err();
    assert!(matches!(err, ListingError::Index { index: 1, len: 1 }));
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.view().messages.last().unwrap().1, Severity::Error);
}

#[test]
fn test_toggle_twice_restores_original_order() {
    let mut engine = engine_with(
        MemoryStorage::new(),
        &[("AAA000", 2000), ("BBB000", 2023), ("CCC000", 1990)],
    );
    let original = engine.view().plates().join(",");

    engine.toggle_discount_filter(true);
    engine.toggle_discount_filter(true);
    assert_eq!(engine.state(), &DisplayState::Listing(ViewMode::DiscountedOnly));
    assert_eq!(engine.view().plates(), vec!["AAA000", "CCC000"]);

    engine.toggle_discount_filter(false);
    assert_eq!(engine.view().plates().join(","), original);
    assert_eq!(engine.state(), &DisplayState::Listing(ViewMode::All));
}

#[test]
fn test_search_not_found_keeps_typed_plate() {
    let mut engine = engine_with(MemoryStorage::new(), &[("AAA000", 2000)]);
    let renders_before = engine.view().render_count;

    let result = engine.search("  qrs999 ");
    assert_eq!(
        result,
        SearchResult::NotFound {
            plate: "QRS999".to_string()
        }
    );
    let (message, severity) = engine.view().messages.last().unwrap();
    assert_eq!(*severity, Severity::Error);
    assert!(message.contains("QRS999"));
    assert_eq!(engine.view().render_count, renders_before);
}

#[test]
fn test_search_found_highlights_single_row() {
    let mut engine = engine_with(MemoryStorage::new(), &[("AAA000", 2000), ("BBB000", 2023)]);

    assert!(engine.search("bbb000").is_found());
    assert_eq!(engine.view().plates(), vec!["BBB000"]);
    assert_eq!(engine.view().highlight, Some(0));

    engine.show_all();
    assert_eq!(engine.view().plates(), vec!["AAA000", "BBB000"]);
    assert_eq!(engine.view().highlight, None);
}

#[test]
fn test_every_mutation_and_rejection_notifies_once() {
    let mut engine = engine_with(MemoryStorage::new(), &[]);

    let mut bad_plate = car_fields("AB12", 2000);
    engine.create(&bad_plate).unwrap_err();
    bad_plate.license_plate = "ABC123".to_string();
    engine.create(&bad_plate).unwrap();
    engine.delete_plate("abc123").unwrap();
    engine.delete_plate("abc123").unwrap_err();

    let messages: Vec<&str> = engine
        .view()
        .messages
        .iter()
        .map(|(m, _)| m.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Error: Please enter a license plate in the following format: ABC123",
            "Your new listing has been created!",
            "Success: Listing was deleted",
            "Error: No car with license plate ABC123 found",
        ]
    );
}

#[test]
fn test_write_failure_surfaces_and_rolls_back() {
    let storage = MemoryStorage::new();
    let mut engine = engine_with(storage.clone(), &[("AAA000", 2000)]);
    storage.set_quota(Some(10)).unwrap();

    let err = engine.create(&car_fields("BBB000", 2001)).unwrap_err();
    assert!(matches!(err, ListingError::PersistenceWrite { .. }));
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.view().plates(), vec!["AAA000"]);
    assert_eq!(engine.view().messages.last().unwrap().1, Severity::Error);
}
