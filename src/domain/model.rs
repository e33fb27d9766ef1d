use crate::utils::error::Result;
use crate::utils::validation::{
    normalize_plate, validate_license_plate, validate_non_empty_string, validate_price,
    validate_range,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Year of the first production automobile; the lower bound for `year`.
pub const FIRST_CAR_YEAR: i32 = 1886;

/// Cars strictly older than this many years qualify for the discount.
pub const DISCOUNT_AGE_YEARS: i32 = 10;

pub const DISCOUNT_RATE: f64 = 0.15;

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Raw listing form input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFields {
    pub license_plate: String,
    pub maker: String,
    pub model: String,
    pub owner: String,
    pub year: String,
    pub color: String,
    pub price: String,
}

/// Persisted shape of a car; no invariants are assumed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    pub license_plate: String,
    pub maker: String,
    pub model: String,
    pub owner: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
}

/// A validated listing. Fields can only be set through [`Car::new`] or
/// [`Car::from_record`], so every instance satisfies the format and range
/// invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "CarRecord")]
pub struct Car {
    license_plate: String,
    maker: String,
    model: String,
    owner: String,
    year: i32,
    color: String,
    price: f64,
}

impl Car {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        license_plate: &str,
        maker: &str,
        model: &str,
        owner: &str,
        year: i32,
        color: &str,
        price: f64,
        current_year: i32,
    ) -> Result<Self> {
        let license_plate = normalize_plate(license_plate);
        validate_license_plate("licensePlate", &license_plate)?;
        validate_non_empty_string("maker", maker)?;
        validate_non_empty_string("model", model)?;
        validate_non_empty_string("owner", owner)?;
        validate_range("year", year, FIRST_CAR_YEAR, current_year)?;
        validate_non_empty_string("color", color)?;
        validate_price("price", price)?;

        Ok(Self {
            license_plate,
            maker: maker.trim().to_string(),
            model: model.trim().to_string(),
            owner: owner.trim().to_string(),
            year,
            color: color.trim().to_string(),
            price,
        })
    }

    /// Revalidates a record read back from storage.
    pub fn from_record(record: CarRecord, current_year: i32) -> Result<Self> {
        Self::new(
            &record.license_plate,
            &record.maker,
            &record.model,
            &record.owner,
            record.year,
            &record.color,
            record.price,
            current_year,
        )
    }

    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    pub fn maker(&self) -> &str {
        &self.maker
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_over_ten_years_at(&self, current_year: i32) -> bool {
        current_year - self.year > DISCOUNT_AGE_YEARS
    }

    pub fn is_over_ten_years(&self) -> bool {
        self.is_over_ten_years_at(current_year())
    }

    /// Price after the age discount, or `None` when the car does not qualify.
    pub fn discounted_price_at(&self, current_year: i32) -> Option<f64> {
        self.is_over_ten_years_at(current_year)
            .then(|| self.price * (1.0 - DISCOUNT_RATE))
    }

    pub fn discounted_price(&self) -> Option<f64> {
        self.discounted_price_at(current_year())
    }
}

impl From<Car> for CarRecord {
    fn from(car: Car) -> Self {
        Self {
            license_plate: car.license_plate,
            maker: car.maker,
            model: car.model,
            owner: car.owner,
            year: car.year,
            color: car.color,
            price: car.price,
        }
    }
}

impl From<&Car> for CarRecord {
    fn from(car: &Car) -> Self {
        car.clone().into()
    }
}
