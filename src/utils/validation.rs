use crate::utils::error::{ListingError, Result};
use regex::Regex;
use std::sync::LazyLock;

static LICENSE_PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").expect("static pattern"));

static SLOT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Canonical plate form: trimmed, uppercase.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Accepts three ASCII letters followed by three digits, in any letter case.
pub fn is_valid_plate(plate: &str) -> bool {
    LICENSE_PLATE.is_match(plate)
}

pub fn validate_license_plate(field_name: &str, plate: &str) -> Result<()> {
    if !is_valid_plate(plate) {
        return Err(ListingError::format(
            field_name,
            plate,
            "expected three letters followed by three digits, e.g. ABC123",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ListingError::format(
            field_name,
            value,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ListingError::range(
            field_name,
            value.to_string(),
            format!("value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn parse_year(field_name: &str, raw: &str, min: i32, max: i32) -> Result<i32> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ListingError::range(field_name, raw, "not a whole number"))?;
    validate_range(field_name, year, min, max)?;
    Ok(year)
}

pub fn parse_price(field_name: &str, raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ListingError::range(field_name, raw, "not a number"))?;
    validate_price(field_name, price)?;
    Ok(price)
}

pub fn validate_price(field_name: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ListingError::range(
            field_name,
            price.to_string(),
            "price must be a non-negative number",
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ListingError::ConfigError {
            field: field_name.to_string(),
            message: "path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ListingError::ConfigError {
            field: field_name.to_string(),
            message: "path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Slot names become file names, so keep them to a portable character set.
pub fn validate_slot_name(field_name: &str, slot: &str) -> Result<()> {
    if !SLOT_NAME.is_match(slot) {
        return Err(ListingError::ConfigError {
            field: field_name.to_string(),
            message: format!(
                "invalid slot name '{}': use letters, digits, '-' or '_'",
                slot
            ),
        });
    }
    Ok(())
}
