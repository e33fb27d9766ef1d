//! Read-only projections over a listing snapshot.

use crate::domain::model::Car;
use crate::utils::validation::normalize_plate;

/// Which subset of the collection the listing table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    All,
    DiscountedOnly,
}

impl ViewMode {
    /// Maps the discount checkbox state to a mode.
    pub fn from_toggle(discount_only: bool) -> Self {
        if discount_only {
            Self::DiscountedOnly
        } else {
            Self::All
        }
    }

    pub fn apply(self, cars: &[Car], current_year: i32) -> Vec<Car> {
        match self {
            Self::All => cars.to_vec(),
            Self::DiscountedOnly => older_than_ten_years(cars, current_year),
        }
    }
}

/// Cars qualifying for the age discount, in collection order.
pub fn older_than_ten_years(cars: &[Car], current_year: i32) -> Vec<Car> {
    cars.iter()
        .filter(|car| car.is_over_ten_years_at(current_year))
        .cloned()
        .collect()
}

pub fn position_of(cars: &[Car], plate: &str) -> Option<usize> {
    let plate = normalize_plate(plate);
    cars.iter().position(|car| car.license_plate() == plate)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found { car: Car },
    NotFound { plate: String },
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Found { .. } => "Success: Car found".to_string(),
            Self::NotFound { plate } => format!(
                "No car with license plate {} found. Check spelling and try again",
                plate
            ),
        }
    }
}

pub fn search(cars: &[Car], text: &str) -> SearchResult {
    let plate = normalize_plate(text);
    tracing::debug!("Searching {} listing(s) for {}", cars.len(), plate);

    match cars.iter().find(|car| car.license_plate() == plate) {
        Some(car) => SearchResult::Found { car: car.clone() },
        None => SearchResult::NotFound { plate },
    }
}
