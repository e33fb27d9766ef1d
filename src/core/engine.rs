use crate::core::query::{self, SearchResult, ViewMode};
use crate::core::store::ListingStore;
use crate::domain::model::{Car, CarFields};
use crate::domain::ports::{Severity, Storage, View};
use crate::utils::error::{ListingError, Result};

/// What the listing table currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Listing(ViewMode),
    Search { plate: String },
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::Listing(ViewMode::All)
    }
}

/// Drives a [`View`] from a [`ListingStore`].
///
/// The engine remembers which plates are on screen, so the view can refer
/// to rows by their displayed position while the store only ever sees
/// plates. Each create, delete and search sends exactly one notification.
pub struct ListingEngine<S: Storage, V: View> {
    store: ListingStore<S>,
    view: V,
    state: DisplayState,
    displayed: Vec<String>,
}

impl<S: Storage, V: View> ListingEngine<S, V> {
    pub fn new(store: ListingStore<S>, view: V) -> Self {
        Self {
            store,
            view,
            state: DisplayState::default(),
            displayed: Vec::new(),
        }
    }

    /// Renders the initial listing and reports any data lost while loading.
    pub fn start(&mut self) {
        if let Some(warning) = self.store.load_warning() {
            let message = format!("Error: {}", warning.user_friendly_message());
            self.view.notify(&message, Severity::Error);
        } else if self.store.skipped_on_load() > 0 {
            let message = format!(
                "Error: {} saved listing(s) could not be read and were skipped",
                self.store.skipped_on_load()
            );
            self.view.notify(&message, Severity::Error);
        }
        self.refresh();
    }

    pub fn create(&mut self, fields: &CarFields) -> Result<Car> {
        let result = self.store.create(fields);
        if result.is_ok() {
            self.leave_search();
            self.refresh();
        }
        self.report(result, |_| "Your new listing has been created!".to_string())
    }

    /// Deletes the listing shown at `display_index` in the current view.
    pub fn delete(&mut self, display_index: usize) -> Result<Car> {
        let result = match self.displayed.get(display_index) {
            Some(plate) => {
                let plate = plate.clone();
                self.store.delete(&plate)
            }
            None => Err(ListingError::Index {
                index: display_index,
                len: self.displayed.len(),
            }),
        };
        self.after_delete(result)
    }

    pub fn delete_plate(&mut self, plate: &str) -> Result<Car> {
        let result = self.store.delete(plate);
        self.after_delete(result)
    }

    pub fn search(&mut self, text: &str) -> SearchResult {
        let result = query::search(self.store.cars(), text);
        match &result {
            SearchResult::Found { car } => {
                self.state = DisplayState::Search {
                    plate: car.license_plate().to_string(),
                };
                self.refresh();
                self.view.notify(&result.message(), Severity::Success);
            }
            SearchResult::NotFound { .. } => {
                self.view.notify(&result.message(), Severity::Error);
            }
        }
        result
    }

    pub fn toggle_discount_filter(&mut self, discount_only: bool) {
        self.state = DisplayState::Listing(ViewMode::from_toggle(discount_only));
        self.refresh();
    }

    pub fn show_all(&mut self) {
        self.toggle_discount_filter(false);
    }

    /// Cars currently on screen, in display order.
    pub fn displayed_cars(&self) -> Vec<Car> {
        self.displayed
            .iter()
            .filter_map(|plate| self.store.find_by_plate(plate).cloned())
            .collect()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn store(&self) -> &ListingStore<S> {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_parts(self) -> (ListingStore<S>, V) {
        (self.store, self.view)
    }

    fn after_delete(&mut self, result: Result<Car>) -> Result<Car> {
        if result.is_ok() {
            self.leave_search();
            self.refresh();
        }
        self.report(result, |_| "Success: Listing was deleted".to_string())
    }

    fn leave_search(&mut self) {
        if matches!(self.state, DisplayState::Search { .. }) {
            self.state = DisplayState::default();
        }
    }

    fn refresh(&mut self) {
        let search_gone = matches!(
            &self.state,
            DisplayState::Search { plate } if self.store.find_by_plate(plate).is_none()
        );
        if search_gone {
            self.state = DisplayState::default();
        }

        let (cars, highlight) = match &self.state {
            DisplayState::Listing(mode) => {
                (mode.apply(self.store.cars(), self.store.current_year()), None)
            }
            DisplayState::Search { plate } => {
                let found: Vec<Car> = self.store.find_by_plate(plate).cloned().into_iter().collect();
                (found, Some(0))
            }
        };

        self.displayed = cars.iter().map(|c| c.license_plate().to_string()).collect();
        self.view.render(&cars, highlight);
    }

    fn report<T>(&mut self, result: Result<T>, success: impl FnOnce(&T) -> String) -> Result<T> {
        match &result {
            Ok(value) => self.view.notify(&success(value), Severity::Success),
            Err(e) => {
                tracing::debug!("Rejected: {} ({:?})", e, e.category());
                let message = format!("Error: {}", e.user_friendly_message());
                self.view.notify(&message, Severity::Error);
            }
        }
        result
    }
}
