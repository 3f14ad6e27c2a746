use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NON_NUMERIC_MESSAGE: &str = "Latitude and Longitude must be valid numbers.";
pub const OUT_OF_RANGE_MESSAGE: &str = "Latitude/Longitude out of valid region range.";
pub const UNKNOWN_DISTRICT_MESSAGE: &str = "District must be one of the known Punjab districts.";

/// Unit suffix of every predicted concentration.
pub const CONCENTRATION_UNIT: &str = "μg/L";

/// 有效經緯度範圍 (含邊界)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Approximate bounding box of Punjab.
pub const REGION: BoundingBox = BoundingBox {
    min_latitude: 27.0,
    max_latitude: 34.0,
    min_longitude: 73.0,
    max_longitude: 77.0,
};

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }
}

/// A coordinate inside [`REGION`]. Only constructible through [`Coordinate::checked`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(PredictorError::validation(NON_NUMERIC_MESSAGE));
        }
        if !REGION.contains(latitude, longitude) {
            return Err(PredictorError::validation(OUT_OF_RANGE_MESSAGE));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

macro_rules! districts {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Punjab districts offered by the form. Display only; never a model input.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum District {
            $($variant),+
        }

        impl District {
            pub const ALL: &'static [District] = &[$(District::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(District::$variant => $name),+
                }
            }
        }
    };
}

districts! {
    Amritsar => "Amritsar",
    Barnala => "Barnala",
    Bathinda => "Bathinda",
    Faridkot => "Faridkot",
    FatehgarhSahib => "Fatehgarh Sahib",
    Fazilka => "Fazilka",
    Ferozepur => "Ferozepur",
    Gurdaspur => "Gurdaspur",
    Hoshiarpur => "Hoshiarpur",
    Jalandhar => "Jalandhar",
    Kapurthala => "Kapurthala",
    Ludhiana => "Ludhiana",
    Malerkotla => "Malerkotla",
    Mansa => "Mansa",
    Moga => "Moga",
    Mohali => "Mohali",
    Muktsar => "Muktsar",
    Pathankot => "Pathankot",
    Patiala => "Patiala",
    Rupnagar => "Rupnagar",
    Sangrur => "Sangrur",
    TarnTaran => "Tarn Taran",
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for District {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        District::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PredictorError::validation(UNKNOWN_DISTRICT_MESSAGE))
    }
}

impl Serialize for District {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Single-row model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    pub latitude: f64,
    pub longitude: f64,
}

impl FeatureRecord {
    pub const FIELDS: [&'static str; 2] = [LATITUDE, LONGITUDE];

    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            LATITUDE => Some(self.latitude),
            LONGITUDE => Some(self.longitude),
            _ => None,
        }
    }

    /// 依模型宣告的特徵順序取值
    pub fn project(&self, features: &[String]) -> Result<Vec<f64>> {
        features
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| {
                    PredictorError::prediction(format!("feature '{}' is not in the record", name))
                })
            })
            .collect()
    }
}

impl From<Coordinate> for FeatureRecord {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Raw form submission. Latitude and longitude stay text until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

impl PredictionRequest {
    pub fn new(
        district: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub district: District,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub prediction: f64,
    pub unit: &'static str,
}

/// Mutually exclusive result of one submission.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Prediction),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
