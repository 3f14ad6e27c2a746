use crate::domain::model::{Coordinate, NON_NUMERIC_MESSAGE};
use crate::utils::error::{PredictorError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates raw latitude/longitude text into a [`Coordinate`].
///
/// Both values must parse before the range is checked, so `("abc", "200")`
/// reports the non-numeric error rather than the range error.
pub fn validate_coordinates(latitude: &str, longitude: &str) -> Result<Coordinate> {
    let (lat, lon) = match (parse_number(latitude), parse_number(longitude)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            tracing::debug!(latitude, longitude, "rejected non-numeric coordinate");
            return Err(PredictorError::validation(NON_NUMERIC_MESSAGE));
        }
    };

    Coordinate::checked(lat, lon)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PredictorError::config(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(PredictorError::config(
            field_name,
            format!("Path '{}' contains null bytes", path.replace('\0', "\\0")),
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PredictorError::config(
            field_name,
            "Value cannot be empty or whitespace-only",
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
        return Err(PredictorError::config(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}
